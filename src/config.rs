use snafu::{ResultExt, Snafu};
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub token_list: String,
    pub send_key_list: String,
}

impl Config {
    pub fn from_environment() -> Result<Self> {
        let token_list = env::var("TOKEN_LIST").context(UnknownTokenListSnafu)?;
        let send_key_list = env::var("SEND_KEY_LIST").context(UnknownSendKeyListSnafu)?;

        Ok(Self {
            token_list,
            send_key_list,
        })
    }
}

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("TOKEN_LIST must be set"))]
    UnknownTokenList { source: env::VarError },

    #[snafu(display("SEND_KEY_LIST must be set"))]
    UnknownSendKeyList { source: env::VarError },
}

type Result<T, E = Error> = std::result::Result<T, E>;
