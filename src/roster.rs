use crate::{
    domain::{AccessToken, AccountGroup, SendKey},
    Config,
};
use snafu::{ensure, Snafu};
use tracing::warn;

/// Pairs the credential and send-key lists by position and folds them
/// into one group per distinct send key, preserving first-seen key
/// order and per-key credential order.
pub fn build_groups(config: &Config) -> Result<Vec<AccountGroup>> {
    let tokens = split_list(&config.token_list);
    let send_keys = split_list(&config.send_key_list);

    ensure!(!tokens.is_empty(), NoTokensSnafu);
    ensure!(!send_keys.is_empty(), NoSendKeysSnafu);

    if tokens.len() != send_keys.len() {
        warn!(
            tokens = tokens.len(),
            send_keys = send_keys.len(),
            "Credential and send-key lists differ in length; the longer tail is ignored"
        );
    }

    let mut groups: Vec<AccountGroup> = Vec::new();
    for (token, send_key) in tokens.into_iter().zip(send_keys) {
        let token = AccessToken(token);
        match groups.iter_mut().find(|g| g.send_key.0 == send_key) {
            Some(group) => group.tokens.push(token),
            None => groups.push(AccountGroup {
                send_key: SendKey(send_key),
                tokens: vec![token],
            }),
        }
    }

    Ok(groups)
}

// Both commas and newlines separate entries; GitHub secrets tend to
// arrive with either.
fn split_list(raw: &str) -> Vec<String> {
    raw.replace('\n', ",")
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .collect()
}

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("TOKEN_LIST is empty after normalization"))]
    NoTokens,

    #[snafu(display("SEND_KEY_LIST is empty after normalization"))]
    NoSendKeys,
}

type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    fn config(token_list: &str, send_key_list: &str) -> Config {
        Config {
            token_list: token_list.to_owned(),
            send_key_list: send_key_list.to_owned(),
        }
    }

    fn total_tokens(groups: &[AccountGroup]) -> usize {
        groups.iter().map(|g| g.tokens.len()).sum()
    }

    #[test]
    fn groups_by_send_key_in_first_seen_order() {
        let groups =
            build_groups(&config("tok1111,tok2222,tok3333", "keyA,keyB,keyA")).unwrap();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].send_key.0, "keyA");
        assert_eq!(
            groups[0].tokens,
            vec![
                AccessToken("tok1111".to_owned()),
                AccessToken("tok3333".to_owned()),
            ],
        );
        assert_eq!(groups[1].send_key.0, "keyB");
        assert_eq!(groups[1].tokens, vec![AccessToken("tok2222".to_owned())]);
    }

    #[test]
    fn every_credential_lands_in_exactly_one_group() {
        let groups =
            build_groups(&config("t1,t2,t3,t4", "keyA,keyB,keyB,keyC")).unwrap();

        assert_eq!(total_tokens(&groups), 4);
        let keys: Vec<_> = groups.iter().map(|g| g.send_key.0.as_str()).collect();
        assert_eq!(keys, ["keyA", "keyB", "keyC"]);
    }

    #[test]
    fn accepts_newlines_and_mixed_delimiters() {
        let groups = build_groups(&config(
            "tok1111\ntok2222, tok3333\n",
            "keyA,keyA\nkeyB",
        ))
        .unwrap();

        assert_eq!(groups.len(), 2);
        assert_eq!(
            groups[0].tokens,
            vec![
                AccessToken("tok1111".to_owned()),
                AccessToken("tok2222".to_owned()),
            ],
        );
        assert_eq!(groups[1].tokens, vec![AccessToken("tok3333".to_owned())]);
    }

    #[test]
    fn truncates_to_the_shorter_list() {
        let groups = build_groups(&config("tok1111,tok2222,tok3333", "keyA")).unwrap();
        assert_eq!(total_tokens(&groups), 1);

        let groups = build_groups(&config("tok1111", "keyA,keyB,keyC")).unwrap();
        assert_eq!(total_tokens(&groups), 1);
        assert_eq!(groups[0].send_key.0, "keyA");
    }

    #[test]
    fn rejects_an_empty_token_list() {
        let e = build_groups(&config(" , ,", "keyA")).unwrap_err();
        assert!(matches!(e, Error::NoTokens));
    }

    #[test]
    fn rejects_an_empty_send_key_list() {
        let e = build_groups(&config("tok1111", "\n\n")).unwrap_err();
        assert!(matches!(e, Error::NoSendKeys));
    }
}
