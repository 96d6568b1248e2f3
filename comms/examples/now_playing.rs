use std::time::Duration;

use comms::{
    transport::client::{HttpRoomApi, RoomApi},
    ApiError,
};

// Prints the track playing in the room of the current backend session, once per second.
//
// usage: cargo run -p comms --features client --example now_playing -- http://localhost:8000
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let base_url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "http://localhost:8000".into());
    let api = HttpRoomApi::new(&base_url)?;

    let mut ticker = tokio::time::interval(Duration::from_secs(1));

    loop {
        ticker.tick().await;

        match api.current_song().await {
            Ok(Some(song)) => println!(
                "{} - {} [{}/{}s] {}",
                song.artist,
                song.title,
                song.position_ms / 1000,
                song.duration_ms / 1000,
                if song.is_playing { "playing" } else { "paused" }
            ),
            Ok(None) => println!("nothing is playing"),
            Err(ApiError::Unauthenticated) => {
                println!("spotify authorization expired, open {}", api.auth_url().await?);
                return Ok(());
            }
            Err(err) => println!("could not fetch the current song: {err}"),
        }
    }
}
