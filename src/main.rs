use model_evaluation::EvaluationJob;
use std::env;
use std::error::Error;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let job_path = match env::args_os().nth(1) {
        Some(path) => PathBuf::from(path),
        None => return Err("Usage: model-evaluation <job.json>".into()),
    };
    if !job_path.exists() {
        return Err(
            format!("Job path does not exist, or cannot be read: {:?}", job_path).into()
        );
    }
    let metrics = EvaluationJob::from_path(&job_path)?.run()?;
    println!("{}", serde_json::to_string_pretty(&metrics)?);
    Ok(())
}
