use freight_risk_api::run;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("freight risk error: {err}");
        std::process::exit(1);
    }
}
