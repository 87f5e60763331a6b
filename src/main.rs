#[tokio::main]
async fn main() {
    interview_backend::run().await;
}
