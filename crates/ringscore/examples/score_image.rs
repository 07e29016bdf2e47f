use ringscore::{detect, CandidateBrowser, Navigation, ScoringConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let (Some(config_path), Some(image_path)) = (args.next(), args.next()) else {
        eprintln!("Usage: score_image <config.json> <image_path>");
        return Ok(());
    };

    let cfg = ScoringConfig::load_json(config_path)?;
    let pipeline = cfg.build_pipeline()?;
    let gray = detect::load_gray(image_path)?;

    let mut browser = CandidateBrowser::new();
    let n = pipeline.run_into(&gray.view(), &mut browser)?;
    println!("candidates: {n}");
    if n == 0 {
        return Ok(());
    }

    loop {
        let c = browser.current()?;
        println!(
            "  {:?} distance={:.1} score={}",
            c.region, c.distance, c.score
        );
        if let Navigation::Boundary(_) = browser.next()? {
            break;
        }
    }

    Ok(())
}
