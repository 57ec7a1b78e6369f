use quest_core::{ClientConfig, Dispatcher};

use crate::cli::args::ClientArgs;
use crate::exit_codes;

pub fn run(client: &ClientArgs) -> anyhow::Result<i32> {
    let dispatcher = Dispatcher::new(client.apply(ClientConfig::from_env()))?;
    for (idx, endpoint) in dispatcher.candidates().iter().enumerate() {
        println!(
            "{}. {:<6}  {}  (timeout {}ms)",
            idx + 1,
            endpoint.label,
            endpoint.url,
            endpoint.timeout.as_millis()
        );
    }
    println!("then: mock catalog");
    Ok(exit_codes::SUCCESS)
}
