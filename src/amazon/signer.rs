//! AWS Signature Version 4 request signing.

use anyhow::{anyhow, Result};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

const ALGORITHM: &str = "AWS4-HMAC-SHA256";

type HmacSha256 = Hmac<Sha256>;

/// Signs requests for one AWS region and service.
pub struct Signer {
    access_key: String,
    secret_key: String,
    region: &'static str,
    service: &'static str,
}

impl Signer {
    /// Creates a signer for `service` in `region`.
    pub fn new(
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        region: &'static str,
        service: &'static str,
    ) -> Self {
        Self { access_key: access_key.into(), secret_key: secret_key.into(), region, service }
    }

    /// Builds the `Authorization` header value for a request with no query string.
    ///
    /// `headers` are the signed headers as lowercase name/value pairs, in any
    /// order. `amz_date` is the `X-Amz-Date` value, e.g. `20240115T103000Z`.
    pub fn authorization(
        &self,
        method: &str,
        uri: &str,
        headers: &[(&str, &str)],
        payload: &[u8],
        amz_date: &str,
    ) -> Result<String> {
        let date_stamp = amz_date
            .get(..8)
            .filter(|d| d.bytes().all(|b| b.is_ascii_digit()))
            .ok_or_else(|| anyhow!("Invalid x-amz-date: {}", amz_date))?;

        let mut headers = headers.to_vec();
        headers.sort_by(|a, b| a.0.cmp(b.0));

        let canonical_headers: String =
            headers.iter().map(|(name, value)| format!("{}:{}\n", name, value.trim())).collect();
        let signed_headers = headers.iter().map(|(name, _)| *name).collect::<Vec<_>>().join(";");

        let canonical_request = format!(
            "{}\n{}\n\n{}\n{}\n{}",
            method,
            uri,
            canonical_headers,
            signed_headers,
            sha256_hex(payload)
        );

        let scope = format!("{}/{}/{}/aws4_request", date_stamp, self.region, self.service);
        let string_to_sign = format!(
            "{}\n{}\n{}\n{}",
            ALGORITHM,
            amz_date,
            scope,
            sha256_hex(canonical_request.as_bytes())
        );

        let signing_key = self.signing_key(date_stamp)?;
        let signature = hex(&hmac_sha256(&signing_key, string_to_sign.as_bytes())?);

        Ok(format!(
            "{} Credential={}/{}, SignedHeaders={}, Signature={}",
            ALGORITHM, self.access_key, scope, signed_headers, signature
        ))
    }

    fn signing_key(&self, date_stamp: &str) -> Result<Vec<u8>> {
        let secret = format!("AWS4{}", self.secret_key);
        let k_date = hmac_sha256(secret.as_bytes(), date_stamp.as_bytes())?;
        let k_region = hmac_sha256(&k_date, self.region.as_bytes())?;
        let k_service = hmac_sha256(&k_region, self.service.as_bytes())?;
        hmac_sha256(&k_service, b"aws4_request")
    }
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(key).map_err(|_| anyhow!("HMAC key rejected"))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

fn sha256_hex(data: &[u8]) -> String {
    format!("{:x}", Sha256::digest(data))
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
