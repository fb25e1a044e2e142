use std::fmt;

const MASK_PLACEHOLDER: &str = "****";

/// Opaque bearer credential for one account. `Debug` is masked so a
/// stray `{:?}` can never leak the raw token into a log.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AccessToken(pub String);

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccessToken({})", mask(&self.0))
    }
}

/// Opaque push-channel key. Many accounts may share one key.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SendKey(pub String);

impl fmt::Debug for SendKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SendKey({})", mask(&self.0))
    }
}

/// All accounts reporting to one push channel, in input order.
#[derive(Debug, Clone)]
pub struct AccountGroup {
    pub send_key: SendKey,
    pub tokens: Vec<AccessToken>,
}

#[derive(Debug)]
pub struct OutgoingNotification {
    pub send_key: SendKey,
    pub title: String,
    pub body: String,
}

/// Keeps the first and last two characters and hides the interior.
/// Inputs too short to have distinct edges collapse to the bare
/// placeholder.
pub fn mask(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() < 3 {
        return MASK_PLACEHOLDER.to_owned();
    }

    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}{}{}", head, MASK_PLACEHOLDER, tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn mask_keeps_only_the_edges() {
        assert_eq!(mask("tok1111"), "to****11");
        assert_eq!(mask("CU123456"), "CU****56");
    }

    #[test]
    fn mask_collapses_short_input() {
        assert_eq!(mask(""), "****");
        assert_eq!(mask("a"), "****");
        assert_eq!(mask("ab"), "****");
    }

    #[test]
    fn debug_output_never_contains_the_raw_secret() {
        let token = AccessToken("supersecrettoken".to_owned());
        let printed = format!("{:?}", token);

        assert!(!printed.contains("supersecrettoken"));
        assert!(printed.contains("su****en"));

        let key = SendKey("SCT12345ABCDE".to_owned());
        let printed = format!("{:?}", key);

        assert!(!printed.contains("SCT12345ABCDE"));
        assert!(printed.contains("SC****DE"));
    }

    proptest! {
        #[test]
        fn mask_preserves_only_the_edges(s in "[a-zA-Z0-9]{3,40}") {
            let masked = mask(&s);
            prop_assert_eq!(masked, format!("{}****{}", &s[..2], &s[s.len() - 2..]));
        }

        #[test]
        fn mask_degrades_anything_shorter_than_three(s in "[a-zA-Z0-9]{0,2}") {
            prop_assert_eq!(mask(&s), "****");
        }
    }
}
