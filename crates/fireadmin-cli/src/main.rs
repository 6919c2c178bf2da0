use fireadmin_cli::{FirebaseConnector, run};

#[tokio::main]
async fn main() {
    let connector = FirebaseConnector::from_env();
    let mut stdout = std::io::stdout();

    let code = run(std::env::args_os(), &connector, &mut stdout).await;
    std::process::exit(code);
}
