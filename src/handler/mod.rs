use std::{fmt::Display, future::IntoFuture};

use tracing::debug;

pub use self::{account_state::get_account, market_state::list_markets};

mod account_state;
mod market_state;

/// Uniform call-or-default policy for reads feeding optional snapshot
/// fields: any failure (transport, revert, missing method) yields None.
pub(crate) async fn try_call<T, E>(
    label: &str,
    call: impl IntoFuture<Output = Result<T, E>>,
) -> Option<T>
where
    E: Display,
{
    match call.await {
        Ok(value) => Some(value),
        Err(e) => {
            debug!("Call {} degraded: {}", label, e);
            None
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn try_call_passes_values_through() {
        let result: Option<u32> =
            try_call("ok", async { Ok::<_, String>(7) }).await;
        assert_eq!(result, Some(7));
    }

    #[tokio::test]
    async fn try_call_absorbs_failures() {
        let result: Option<u32> =
            try_call("err", async { Err(String::from("revert")) }).await;
        assert_eq!(result, None);
    }
}
