use crate::{domain::AccessToken, redact};
use reqwest::header;
use serde::Deserialize;
use serde_json::Value;
use snafu::{OptionExt, ResultExt, Snafu};
use tracing::trace;
use url::Url;

const SIGN_IN_URI: &str = "https://m.jlc.com/api/activity/sign/signIn?source=3";
const ASSETS_URI: &str =
    "https://m.jlc.com/api/appPlatform/center/assets/selectPersonalAssetsInfo";
const RECEIVE_VOUCHER_URI: &str = "https://m.jlc.com/api/activity/sign/receiveVoucher";

const ACCESS_TOKEN_HEADER: &str = "X-JLC-AccessToken";

// The service only answers to its own mobile app.
const USER_AGENT: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_2_1 like Mac OS X) \
     AppleWebKit/605.1.15 (KHTML, like Gecko) Mobile/15E148 Html5Plus/1.0 \
     (Immersed/20) JlcMobileApp";

#[derive(Debug, Deserialize)]
struct SignInResponse {
    data: Option<SignInData>,
}

/// Outcome of the daily sign-in call. A non-positive `status` means the
/// account had already checked in; a missing `gain_num` on success
/// marks a milestone-bonus day.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SignInData {
    pub status: i32,
    #[serde(rename = "gainNum")]
    pub gain_num: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct AssetsResponse {
    data: Option<Assets>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Assets {
    #[serde(rename = "integralVoucher")]
    pub integral_voucher: i64,
    #[serde(rename = "customerCode")]
    pub customer_code: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct BonusReceipt {
    #[serde(default)]
    pub success: bool,
}

#[derive(Debug, Clone)]
pub struct Config {
    sign_in: Url,
    assets: Url,
    receive_voucher: Url,
}

impl Config {
    pub fn new() -> Result<Self> {
        let sign_in = Url::parse(SIGN_IN_URI).context(UnableToConfigureSignInUrlSnafu)?;
        let assets = Url::parse(ASSETS_URI).context(UnableToConfigureAssetsUrlSnafu)?;
        let receive_voucher =
            Url::parse(RECEIVE_VOUCHER_URI).context(UnableToConfigureReceiveVoucherUrlSnafu)?;

        Ok(Self {
            sign_in,
            assets,
            receive_voucher,
        })
    }

    pub fn into_client(self, client: reqwest::Client) -> Client {
        Client {
            client,
            config: self,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Client {
    client: reqwest::Client,
    config: Config,
}

impl Client {
    pub async fn sign_in(&self, token: &AccessToken) -> Result<SignInData> {
        let value = self
            .get(self.config.sign_in.clone(), token)
            .send()
            .await
            .context(UnableToExecuteSignInRequestSnafu)?
            .error_for_status()
            .context(SignInRequestFailedSnafu)?
            .json::<Value>()
            .await
            .context(UnableToReadSignInResponseSnafu)?;

        trace!(response = %redact::scrub(value.clone()), "sign-in response");

        let r: SignInResponse =
            serde_json::from_value(value).context(UnableToDeserializeSignInResponseSnafu)?;
        r.data.context(SignInResponseMissingDataSnafu)
    }

    pub async fn assets(&self, token: &AccessToken) -> Result<Assets> {
        let value = self
            .get(self.config.assets.clone(), token)
            .send()
            .await
            .context(UnableToExecuteAssetsRequestSnafu)?
            .error_for_status()
            .context(AssetsRequestFailedSnafu)?
            .json::<Value>()
            .await
            .context(UnableToReadAssetsResponseSnafu)?;

        trace!(response = %redact::scrub(value.clone()), "assets response");

        let r: AssetsResponse =
            serde_json::from_value(value).context(UnableToDeserializeAssetsResponseSnafu)?;
        r.data.context(AssetsResponseMissingDataSnafu)
    }

    pub async fn receive_voucher(&self, token: &AccessToken) -> Result<BonusReceipt> {
        let value = self
            .get(self.config.receive_voucher.clone(), token)
            .send()
            .await
            .context(UnableToExecuteReceiveVoucherRequestSnafu)?
            .error_for_status()
            .context(ReceiveVoucherRequestFailedSnafu)?
            .json::<Value>()
            .await
            .context(UnableToReadReceiveVoucherResponseSnafu)?;

        trace!(response = %redact::scrub(value.clone()), "receive-voucher response");

        serde_json::from_value(value).context(UnableToDeserializeReceiveVoucherResponseSnafu)
    }

    fn get(&self, url: Url, token: &AccessToken) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .header(header::USER_AGENT, USER_AGENT)
            .header(ACCESS_TOKEN_HEADER, token.0.as_str())
    }
}

#[derive(Debug, Snafu)]
pub enum Error {
    UnableToConfigureSignInUrl {
        source: url::ParseError,
    },

    UnableToConfigureAssetsUrl {
        source: url::ParseError,
    },

    UnableToConfigureReceiveVoucherUrl {
        source: url::ParseError,
    },

    UnableToExecuteSignInRequest {
        source: reqwest::Error,
    },

    SignInRequestFailed {
        source: reqwest::Error,
    },

    UnableToReadSignInResponse {
        source: reqwest::Error,
    },

    UnableToDeserializeSignInResponse {
        source: serde_json::Error,
    },

    #[snafu(display("The sign-in response did not contain a data object"))]
    SignInResponseMissingData,

    UnableToExecuteAssetsRequest {
        source: reqwest::Error,
    },

    AssetsRequestFailed {
        source: reqwest::Error,
    },

    UnableToReadAssetsResponse {
        source: reqwest::Error,
    },

    UnableToDeserializeAssetsResponse {
        source: serde_json::Error,
    },

    #[snafu(display("The assets response did not contain a data object"))]
    AssetsResponseMissingData,

    UnableToExecuteReceiveVoucherRequest {
        source: reqwest::Error,
    },

    ReceiveVoucherRequestFailed {
        source: reqwest::Error,
    },

    UnableToReadReceiveVoucherResponse {
        source: reqwest::Error,
    },

    UnableToDeserializeReceiveVoucherResponse {
        source: serde_json::Error,
    },
}

type Result<T, E = Error> = std::result::Result<T, E>;
