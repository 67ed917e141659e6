use imdb_sentiment::error::Result;
use imdb_sentiment::sentiment::SentimentPipelineBuilder;

fn main() -> Result<()> {
    let dir = std::env::args().nth(1).unwrap_or_else(|| "artifacts".to_string());

    println!("Building pipeline from '{dir}'...");

    let pipeline = SentimentPipelineBuilder::local(dir).build()?;

    println!("Pipeline built successfully.");

    let texts = [
        "I really loved this movie! The story was emotional and the acting was amazing.",
        "Not bad, but not great. It was okay overall.",
        "I hated this film. It was boring and predictable.",
    ];

    println!("\n=== Sentiment Analysis Results ===");
    for text in texts {
        let output = pipeline.run(text)?;
        println!(
            "{} -> {} (confidence: {:.4}, {:.2}ms)",
            text,
            output.prediction.label,
            output.prediction.probability,
            output.stats.total_time.as_secs_f64() * 1000.0
        );
    }

    Ok(())
}
