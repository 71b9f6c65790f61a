use tvcom_core::TvComScraper;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let scraper = TvComScraper::new()?;

    println!("Searching for 'Buffy the Vampire Slayer'...\n");

    let candidates = scraper.search("Buffy the Vampire Slayer").await?;

    println!("Found {} candidates:", candidates.len());
    for (i, show) in candidates.iter().enumerate() {
        println!("  {}. {} -> {}", i + 1, show.name, show.locator.as_str());
    }

    if let Some(show) = candidates.first() {
        println!("\nFetching full episode list for: {}\n", show.name);

        let episodes = scraper.get_episode_list(show).await?;

        for ep in &episodes {
            match &ep.season {
                Some(season) => println!("  {}x{} {}", season, ep.number, ep.title),
                None => println!("  [{}] {}", ep.number, ep.title),
            }
        }

        println!("\n{} episodes total.", episodes.len());
    }

    Ok(())
}
