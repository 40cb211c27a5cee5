use crate::config::AppConfig;
use crate::errors::AcademiaError;
use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};

/// argon2id 哈希，参数来自配置
pub fn hash_password(password: &str) -> Result<String, AcademiaError> {
    let config = &AppConfig::get().argon2;
    let params = Params::new(
        config.memory_cost,
        config.time_cost,
        config.parallelism,
        None,
    )
    .map_err(|e| AcademiaError::validation(format!("Argon2 参数错误: {e}")))?;

    let salt = SaltString::generate(&mut OsRng);
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AcademiaError::validation(format!("密码哈希失败: {e}")))
}

/// 校验密码；哈希中自带参数，无需读取配置
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(!verify_password("Secret123", "not-a-phc-string"));
        assert!(!verify_password("Secret123", ""));
    }

    #[test]
    fn test_verify_with_embedded_params() {
        let salt = SaltString::generate(&mut OsRng);
        let params = Params::new(8, 1, 1, None).unwrap();
        let hash = Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
            .hash_password(b"Secret123", &salt)
            .unwrap()
            .to_string();
        assert!(verify_password("Secret123", &hash));
        assert!(!verify_password("secret123", &hash));
    }
}
