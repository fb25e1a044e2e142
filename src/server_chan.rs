use crate::domain::OutgoingNotification;
use serde::{Deserialize, Serialize};
use snafu::{ensure, ResultExt, Snafu};
use tracing::{trace, trace_span, Instrument};
use url::Url;

const PUSH_URI_BASE: &str = "https://sctapi.ftqq.com/";

#[derive(Debug, Clone)]
pub struct Config {
    base: Url,
}

impl Config {
    pub fn new() -> Result<Self> {
        let base = Url::parse(PUSH_URI_BASE).context(UnableToConfigurePushUrlSnafu)?;

        Ok(Self { base })
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
    pub async fn notify(&self, notification: &OutgoingNotification) -> Result<()> {
        let Self { client, config } = self;
        let s = trace_span!("notify", send_key = ?notification.send_key);

        #[derive(Debug, Serialize)]
        struct NotifyParams<'a> {
            text: &'a str,
            desp: &'a str,
        }

        async {
            trace!("Performing notification");

            let url = config
                .base
                .join(&format!("{}.send", notification.send_key.0))
                .context(UnableToBuildPushUrlSnafu)?;

            let params = NotifyParams {
                text: &notification.title,
                desp: &notification.body,
            };

            let response = client
                .post(url)
                .form(&params)
                .send()
                .await
                .context(UnableToSendNotificationSnafu)?
                .json::<PushResponse>()
                .await
                .context(UnableToDeserializePushResponseSnafu)?;

            ensure!(
                response.code == 0,
                NonSuccessCodeSnafu {
                    code: response.code,
                    message: response.message.unwrap_or_default(),
                },
            );

            let pushid = response.data.and_then(|d| d.pushid).unwrap_or_default();
            trace!(%pushid, "Notification accepted");

            Ok(())
        }
        .instrument(s)
        .await
    }
}

#[derive(Debug, Deserialize)]
pub struct PushResponse {
    pub code: i32,
    pub message: Option<String>,
    pub data: Option<PushData>,
}

#[derive(Debug, Deserialize)]
pub struct PushData {
    pub pushid: Option<String>,
}

#[derive(Debug, Snafu)]
pub enum Error {
    UnableToConfigurePushUrl {
        source: url::ParseError,
    },

    UnableToBuildPushUrl {
        source: url::ParseError,
    },

    UnableToSendNotification {
        source: reqwest::Error,
    },

    UnableToDeserializePushResponse {
        source: reqwest::Error,
    },

    #[snafu(display("The push channel rejected the notification (code {}): {}", code, message))]
    NonSuccessCode { code: i32, message: String },
}

type Result<T, E = Error> = std::result::Result<T, E>;
