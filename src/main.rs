use std::process::ExitCode;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    til::logging::init();

    let args: Vec<String> = std::env::args().collect();
    let env = til::run::Environment::from_process()?;
    match til::run::run(args, &env, None).await? {
        til::run::RunStatus::Success => Ok(ExitCode::SUCCESS),
        til::run::RunStatus::Failure => Ok(ExitCode::FAILURE),
    }
}
