//! Challenge/response scrambles for the authentication plugins this crate supports,
//! plus name-only recognition of the plugins it doesn't.

use memchr::memchr;
use sha1::Sha1;
use sha2::{Digest, Sha256};

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPlugin {
    MySqlNativePassword,
    CachingSha2Password,
    /// Recognized by name for error reporting; no scramble is implemented.
    Sha256Password,
    /// Recognized by name for error reporting; no scramble is implemented.
    MysqlOldPassword,
}

impl AuthPlugin {
    pub fn from_name(name: Option<&str>) -> crate::Result<Self> {
        match name {
            Some("mysql_native_password") | None => Ok(AuthPlugin::MySqlNativePassword),
            Some("caching_sha2_password") => Ok(AuthPlugin::CachingSha2Password),
            Some("sha256_password") => Ok(AuthPlugin::Sha256Password),
            Some("mysql_old_password") => Ok(AuthPlugin::MysqlOldPassword),
            Some(other) => Err(Error::UnsupportedAuthPlugin(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthPlugin::MySqlNativePassword => "mysql_native_password",
            AuthPlugin::CachingSha2Password => "caching_sha2_password",
            AuthPlugin::Sha256Password => "sha256_password",
            AuthPlugin::MysqlOldPassword => "mysql_old_password",
        }
    }

    /// Computes the auth-response bytes for `password` against server challenge
    /// `nonce`. An empty password yields an empty response for both supported
    /// plugins, per the protocol.
    pub fn scramble(&self, password: &str, nonce: &[u8]) -> crate::Result<Vec<u8>> {
        if password.is_empty() {
            return Ok(Vec::new());
        }

        match self {
            AuthPlugin::MySqlNativePassword => {
                // mysql_native_password's nonce is optionally NUL-terminated.
                let end = memchr(b'\0', nonce).unwrap_or(nonce.len());
                Ok(scramble_sha1(password, &nonce[..end]).to_vec())
            }
            AuthPlugin::CachingSha2Password => Ok(scramble_sha256(password, nonce).to_vec()),
            AuthPlugin::Sha256Password | AuthPlugin::MysqlOldPassword => {
                Err(Error::UnsupportedAuthPlugin(self.as_str().to_string()))
            }
        }
    }
}

/// `SHA1(password) XOR SHA1(seed || SHA1(SHA1(password)))`
/// https://mariadb.com/kb/en/connection/#mysql_native_password-plugin
fn scramble_sha1(password: &str, seed: &[u8]) -> [u8; 20] {
    let pw_hash = Sha1::digest(password.as_bytes());
    let pw_hash_hash = Sha1::digest(pw_hash);

    let mut ctx = Sha1::new();
    ctx.update(seed);
    ctx.update(pw_hash_hash);
    let seed_hash_hash = ctx.finalize();

    let mut out = [0u8; 20];
    for i in 0..20 {
        out[i] = pw_hash[i] ^ seed_hash_hash[i];
    }
    out
}

/// `XOR(SHA256(password), SHA256(seed || SHA256(SHA256(password))))`
/// https://mariadb.com/kb/en/caching_sha2_password-authentication-plugin/#sha-2-encrypted-password
fn scramble_sha256(password: &str, seed: &[u8]) -> [u8; 32] {
    let pw_hash = Sha256::digest(password.as_bytes());
    let pw_hash_hash = Sha256::digest(pw_hash);

    let mut ctx = Sha256::new();
    ctx.update(seed);
    ctx.update(pw_hash_hash);
    let seed_hash_hash = ctx.finalize();

    let mut out = [0u8; 32];
    for i in 0..32 {
        out[i] = pw_hash[i] ^ seed_hash_hash[i];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: &[u8] = &[
        10, 47, 74, 111, 75, 73, 34, 48, 88, 76, 114, 74, 37, 13, 3, 80, 82, 2, 23, 21,
    ];

    #[test]
    fn it_matches_scramble_a() {
        let response = scramble_sha256("secret", SEED);
        assert_eq!(
            response.to_vec(),
            vec![
                244, 144, 231, 111, 102, 217, 216, 102, 101, 206, 84, 217, 140, 120, 208, 172,
                254, 47, 176, 176, 139, 66, 61, 168, 7, 20, 72, 115, 211, 11, 49, 44
            ]
        );
    }

    #[test]
    fn it_matches_scramble_b() {
        let response = scramble_sha256("secret2", SEED);
        assert_eq!(
            response.to_vec(),
            vec![
                171, 195, 147, 74, 1, 44, 243, 66, 232, 118, 7, 28, 142, 226, 2, 222, 81, 120,
                91, 67, 2, 88, 167, 160, 19, 139, 199, 156, 77, 128, 11, 198
            ]
        );
    }

    #[test]
    fn empty_password_yields_empty_response_regardless_of_plugin() {
        assert!(AuthPlugin::CachingSha2Password.scramble("", SEED).unwrap().is_empty());
        assert!(AuthPlugin::MySqlNativePassword.scramble("", SEED).unwrap().is_empty());
    }

    #[test]
    fn unsupported_plugins_are_recognized_by_name_but_refuse_to_scramble() {
        let err = AuthPlugin::Sha256Password.scramble("secret", SEED).unwrap_err();
        assert!(matches!(err, Error::UnsupportedAuthPlugin(name) if name == "sha256_password"));
    }
}
