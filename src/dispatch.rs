use crate::{
    domain::{AccessToken, AccountGroup, OutgoingNotification},
    flow::CheckinFlow,
    server_chan,
};
use futures::future;
use std::future::Future;
use tracing::{info, trace_span, warn, Instrument};

const NOTIFICATION_TITLE: &str = "JLC check-in summary";

/// Processes every group concurrently. Groups never wait on each
/// other; each one joins its own workflows before its notification is
/// considered.
pub async fn run(groups: Vec<AccountGroup>, flow: CheckinFlow, push: server_chan::Client) {
    let groups: Vec<_> = groups
        .into_iter()
        .map(|group| {
            let flow = flow.clone();
            let push = push.clone();
            tokio::spawn(async move { process_group(group, flow, push).await })
        })
        .collect();

    for group in future::join_all(groups).await {
        if group.is_err() {
            warn!("A notification group aborted unexpectedly");
        }
    }
}

async fn process_group(group: AccountGroup, flow: CheckinFlow, push: server_chan::Client) {
    let s = trace_span!("process_group", send_key = ?group.send_key);

    async {
        let outcomes = collect_outcomes(group.tokens, move |token| {
            let flow = flow.clone();
            async move { flow.check_in(&token).await }
        })
        .await;

        let body = match summarize(outcomes) {
            Some(body) => body,
            None => {
                info!("Nothing to report for this group");
                return;
            }
        };

        let notification = OutgoingNotification {
            send_key: group.send_key,
            title: NOTIFICATION_TITLE.to_owned(),
            body,
        };

        if let Err(e) = push.notify(&notification).await {
            warn!("Unable to deliver the notification: {}", e);
        }
    }
    .instrument(s)
    .await
}

/// Runs one workflow per credential on its own task and joins them in
/// submission order, so the group keeps exactly one outcome slot per
/// credential. A workflow that panics yields an absent outcome and
/// leaves its siblings running.
async fn collect_outcomes<F, Fut>(tokens: Vec<AccessToken>, workflow: F) -> Vec<Option<String>>
where
    F: Fn(AccessToken) -> Fut,
    Fut: Future<Output = Option<String>> + Send + 'static,
{
    let handles: Vec<_> = tokens
        .into_iter()
        .map(|token| tokio::spawn(workflow(token)))
        .collect();

    let mut outcomes = Vec::with_capacity(handles.len());
    for handle in handles {
        match handle.await {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => {
                warn!("A check-in workflow aborted unexpectedly: {}", e);
                outcomes.push(None);
            }
        }
    }

    outcomes
}

fn summarize(outcomes: Vec<Option<String>>) -> Option<String> {
    let present: Vec<_> = outcomes.into_iter().flatten().collect();

    if present.is_empty() {
        None
    } else {
        Some(present.join("\n\n"))
    }
}
