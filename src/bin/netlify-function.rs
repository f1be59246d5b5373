//! Function entry point: each invocation carries a Netlify-style event and
//! gets back `{statusCode, headers, body}`.

use clap::Parser;
use lambda_runtime::{service_fn, Error, LambdaEvent};

use prompt_relay::{
    config::AppConfig,
    init_tracing,
    netlify::{handle_event, NetlifyEvent, NetlifyResponse},
    relay_from_config,
};

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Functions get no arguments; everything comes from the environment.
    let config = AppConfig::parse();
    init_tracing(&config);

    let relay = relay_from_config(&config);

    lambda_runtime::run(service_fn(move |event: LambdaEvent<NetlifyEvent>| {
        let relay = relay.clone();
        async move { Ok::<NetlifyResponse, Error>(handle_event(&relay, event.payload).await) }
    }))
    .await
}
