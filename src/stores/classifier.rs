//! Host-based retailer classification.

use crate::stores::kind::StoreType;
use tracing::trace;

/// Classifies a URL host into a store, or `None` if no signature matches.
///
/// Signatures are checked in [`StoreType::all`] order. Vivo's signature is only
/// accepted when the host does not also carry the iQOO signature, so an iQOO
/// storefront living under a vivo domain is never taken for Vivo.
pub fn classify_host(host: &str) -> Option<StoreType> {
    let host = host.to_ascii_lowercase();

    let store = StoreType::all().iter().copied().find(|store| match store {
        StoreType::Vivo => {
            host.contains(store.signature()) && !host.contains(StoreType::Iqoo.signature())
        }
        _ => host.contains(store.signature()),
    });

    trace!("Classified host {} as {:?}", host, store);
    store
}
