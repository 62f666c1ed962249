//! 预订令牌生成
//!
//! 每个预订在创建时分配一个一次性令牌，随预订返回给客人，
//! 用于之后提交与桌台绑定的提前点餐订单。

use rand::Rng;

/// 令牌字符集: 大写字母 + 数字
const TOKEN_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// 令牌长度 (9 位)
const TOKEN_LEN: usize = 9;

/// 生成预订令牌
///
/// 9 位大写字母数字串。不做全局唯一性检查，碰撞概率 36^-9 量级。
pub fn generate_token() -> String {
    let mut rng = rand::thread_rng();
    (0..TOKEN_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..TOKEN_CHARSET.len());
            TOKEN_CHARSET[idx] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_format() {
        for _ in 0..100 {
            let token = generate_token();
            assert_eq!(token.len(), 9);
            assert!(
                token
                    .chars()
                    .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()),
                "unexpected character in token: {}",
                token
            );
        }
    }

    #[test]
    fn test_tokens_vary() {
        let a = generate_token();
        let b = generate_token();
        // 36^9 个可能值，连续两次相同几乎不可能
        assert_ne!(a, b);
    }
}
