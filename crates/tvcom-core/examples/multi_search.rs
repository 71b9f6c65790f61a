use tvcom_core::TvComScraper;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let scraper = TvComScraper::new()?;

    // (search query, expected name substring)
    let test_shows = [
        ("Buffy the Vampire Slayer", "Buffy"),
        ("Doctor Who", "Doctor Who"),
        ("Firefly", "Firefly"),
        ("Stargate SG-1", "Stargate"),
    ];

    for (query, expected) in test_shows {
        println!("\n{}", "=".repeat(60));
        println!("Searching: {}", query);
        println!("{}\n", "=".repeat(60));

        let candidates = scraper.search(query).await?;

        if candidates.is_empty() {
            println!("No results!");
            continue;
        }

        // Prefer an exact match, then a substring match, then the first hit
        let show = candidates
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(query))
            .or_else(|| {
                candidates
                    .iter()
                    .find(|c| c.name.to_lowercase().contains(&expected.to_lowercase()))
            })
            .or_else(|| candidates.first());

        if let Some(show) = show {
            println!("Selected: {}", show.name);

            let episodes = scraper.get_episode_list(show).await?;

            println!("\nEpisodes (first 5 of {}):", episodes.len());
            for ep in episodes.iter().take(5) {
                match &ep.season {
                    Some(season) => println!("  {}x{} {}", season, ep.number, ep.title),
                    None => println!("  [{}] {}", ep.number, ep.title),
                }
            }

            let specials = episodes.iter().filter(|e| e.season.is_none()).count();
            if specials > 0 {
                println!("  ({} unnumbered specials in the list)", specials);
            }
        }

        // Pause between shows
        tokio::time::sleep(tokio::time::Duration::from_millis(500)).await;
    }

    println!("\nDone.");
    Ok(())
}
