use crate::{
    domain::{mask, AccessToken},
    jlc,
};
use snafu::{ResultExt, Snafu};
use tracing::{debug, trace_span, warn, Instrument};

// Extra gold beans granted by the milestone-day claim.
const MILESTONE_BONUS: i64 = 8;

/// The full check-in procedure for a single account: sign in, query
/// the balance, and claim the milestone bonus when the service signals
/// one.
#[derive(Debug, Clone)]
pub struct CheckinFlow {
    jlc: jlc::Client,
}

impl CheckinFlow {
    pub fn new(jlc: jlc::Client) -> Self {
        Self { jlc }
    }

    /// Returns the reportable outcome line for one account, or `None`
    /// when there is nothing worth notifying about. Every failure is
    /// absorbed here; siblings never see it.
    pub async fn check_in(&self, token: &AccessToken) -> Option<String> {
        let s = trace_span!("check_in", token = %mask(&token.0));

        async {
            match self.try_check_in(token).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!("Check-in workflow failed: {}", e);
                    None
                }
            }
        }
        .instrument(s)
        .await
    }

    async fn try_check_in(&self, token: &AccessToken) -> Result<Option<String>> {
        let Self { jlc } = self;

        let sign_in = jlc.sign_in(token).await.context(UnableToSignInSnafu)?;
        let assets = jlc.assets(token).await.context(UnableToQueryAssetsSnafu)?;

        let account = mask(&assets.customer_code);

        match Decision::from_sign_in(&sign_in) {
            Decision::Suppress => {
                debug!(status = sign_in.status, "Nothing to report");
                Ok(None)
            }

            Decision::Report { gained } => Ok(Some(checked_in_line(
                &account,
                gained,
                assets.integral_voucher,
            ))),

            Decision::ClaimBonus => {
                let receipt = jlc
                    .receive_voucher(token)
                    .await
                    .context(UnableToClaimBonusSnafu)?;

                if receipt.success {
                    Ok(Some(bonus_line(&account, assets.integral_voucher)))
                } else {
                    debug!("The milestone bonus claim was refused");
                    Ok(None)
                }
            }
        }
    }
}

/// What the sign-in response asks us to do next. A zero gain on a
/// successful sign-in means the reward arrives through the separate
/// milestone claim, the same as an absent one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decision {
    Suppress,
    Report { gained: i64 },
    ClaimBonus,
}

impl Decision {
    fn from_sign_in(data: &jlc::SignInData) -> Self {
        if data.status <= 0 {
            return Self::Suppress;
        }

        match data.gain_num {
            Some(gained) if gained != 0 => Self::Report { gained },
            _ => Self::ClaimBonus,
        }
    }
}

fn checked_in_line(account: &str, gained: i64, balance: i64) -> String {
    format!(
        "Account {}: checked in, earned {} gold beans, balance is now {}",
        account, gained, balance,
    )
}

fn bonus_line(account: &str, balance: i64) -> String {
    format!(
        "Account {}: milestone day, claimed {} bonus gold beans, balance is now {}",
        account,
        MILESTONE_BONUS,
        balance + MILESTONE_BONUS,
    )
}

#[derive(Debug, Snafu)]
enum Error {
    #[snafu(display("Unable to submit the check-in"))]
    UnableToSignIn { source: jlc::Error },

    #[snafu(display("Unable to query the reward balance"))]
    UnableToQueryAssets { source: jlc::Error },

    #[snafu(display("Unable to claim the milestone bonus"))]
    UnableToClaimBonus { source: jlc::Error },
}

type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jlc::SignInData;

    #[test]
    fn non_positive_status_is_suppressed() {
        let d = Decision::from_sign_in(&SignInData {
            status: 0,
            gain_num: Some(5),
        });
        assert_eq!(d, Decision::Suppress);

        let d = Decision::from_sign_in(&SignInData {
            status: -1,
            gain_num: None,
        });
        assert_eq!(d, Decision::Suppress);
    }

    #[test]
    fn a_non_zero_gain_is_reported() {
        let d = Decision::from_sign_in(&SignInData {
            status: 1,
            gain_num: Some(5),
        });
        assert_eq!(d, Decision::Report { gained: 5 });
    }

    #[test]
    fn an_absent_gain_routes_to_the_bonus_claim() {
        let d = Decision::from_sign_in(&SignInData {
            status: 1,
            gain_num: None,
        });
        assert_eq!(d, Decision::ClaimBonus);
    }

    #[test]
    fn a_zero_gain_routes_to_the_bonus_claim() {
        let d = Decision::from_sign_in(&SignInData {
            status: 1,
            gain_num: Some(0),
        });
        assert_eq!(d, Decision::ClaimBonus);
    }

    #[test]
    fn the_checked_in_line_reports_gain_and_balance() {
        let line = checked_in_line("CU****56", 5, 20);
        assert_eq!(
            line,
            "Account CU****56: checked in, earned 5 gold beans, balance is now 20",
        );
    }

    #[test]
    fn the_bonus_line_adds_the_fixed_bonus_to_the_queried_balance() {
        let line = bonus_line("CU****56", 10);
        assert_eq!(
            line,
            "Account CU****56: milestone day, claimed 8 bonus gold beans, balance is now 18",
        );
    }
}
