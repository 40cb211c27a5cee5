use rand::Rng;
use rand::distr::Alphanumeric;
use rand::seq::SliceRandom;

/// 密码重置令牌长度
pub const RESET_TOKEN_LEN: usize = 48;

/// 随机字母数字串
pub fn generate_random_code(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

pub fn generate_reset_token() -> String {
    generate_random_code(RESET_TOKEN_LEN)
}

/// 生成满足密码策略的随机密码（大写、小写、数字各至少一个）
pub fn generate_password(len: usize) -> String {
    const UPPER: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ";
    const LOWER: &[u8] = b"abcdefghijkmnopqrstuvwxyz";
    const DIGITS: &[u8] = b"23456789";

    let len = len.max(8);
    let mut rng = rand::rng();
    let pick = |rng: &mut rand::rngs::ThreadRng, set: &[u8]| set[rng.random_range(0..set.len())];

    let mut bytes = vec![
        pick(&mut rng, UPPER),
        pick(&mut rng, LOWER),
        pick(&mut rng, DIGITS),
    ];
    let all: Vec<u8> = [UPPER, LOWER, DIGITS].concat();
    while bytes.len() < len {
        bytes.push(pick(&mut rng, &all));
    }
    bytes.shuffle(&mut rng);
    bytes.into_iter().map(char::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validate::password_policy_errors;

    #[test]
    fn test_reset_token_shape() {
        let token = generate_reset_token();
        assert_eq!(token.len(), RESET_TOKEN_LEN);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(token, generate_reset_token());
    }

    #[test]
    fn test_generated_password_meets_policy() {
        for _ in 0..20 {
            let password = generate_password(12);
            assert_eq!(password.len(), 12);
            assert!(password_policy_errors(&password).is_empty());
        }
        assert_eq!(generate_password(4).len(), 8);
    }
}
