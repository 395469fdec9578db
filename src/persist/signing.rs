use hmac::digest::InvalidLength;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

// Embedded in the binary. Deters hand-editing; it is not a secret.
const SIGNING_KEY: &[u8] = b"idle-orbit.save-envelope.v1";

/// On-disk wrapper: base64 payload plus the hex HMAC of that base64 text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub data: String,
    pub signature: String,
}

impl Envelope {
    pub fn seal(data: String) -> Result<Self, InvalidLength> {
        let signature = sign(&data)?;
        Ok(Self { data, signature })
    }

    pub fn is_authentic(&self) -> bool {
        verify(&self.data, &self.signature)
    }
}

pub fn sign(data: &str) -> Result<String, InvalidLength> {
    let mut mac = HmacSha256::new_from_slice(SIGNING_KEY)?;
    mac.update(data.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Constant-time comparison against the recomputed MAC.
pub fn verify(data: &str, signature: &str) -> bool {
    let Ok(expected) = hex::decode(signature) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(SIGNING_KEY) else {
        return false;
    };
    mac.update(data.as_bytes());
    mac.verify_slice(&expected).is_ok()
}
