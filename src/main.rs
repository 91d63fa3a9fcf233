mod db;
mod handlers;
mod models;
mod routes;
mod services;
mod utils;

use axum::serve;
use tokio::net::TcpListener;

use routes::make_app;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let app = match make_app().await {
        Ok(app) => app,
        Err(err) => panic!("{}", err),
    };

    let listener = TcpListener::bind("127.0.0.1:3000").await;
    println!("Listening on http://127.0.0.1:3000");

    match listener {
        Ok(res) => serve(res, app).await.unwrap(),
        Err(err) => panic!("{}", err),
    }
}
