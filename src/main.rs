use clap::{Parser, Subcommand};
use flashsim::ingest::Ingestor;
use flashsim::mem::MemoryMap;
use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

//===========================================================================//

#[derive(Parser)]
#[clap(author, about, long_about = None, version)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Flashes an S-record file into a simulated memory bus.
    Flash {
        /// The S-record file to ingest.
        srec: PathBuf,
        /// Write the memory dump to this file instead of stdout.
        #[clap(long)]
        out: Option<PathBuf>,
    },
}

//===========================================================================//

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let cli = Cli::parse();
    match cli.command {
        Command::Flash { srec, out } => {
            let mut ingestor = Ingestor::new(MemoryMap::standard());
            let file = File::open(&srec)?;
            for (number, line) in io::BufReader::new(file).lines().enumerate()
            {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                if let Err(err) = ingestor.ingest_line(&line) {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidData,
                        format!("line {}: {}", number + 1, err),
                    ));
                }
            }
            let map = ingestor.into_map();
            match out {
                Some(path) => {
                    let mut writer = BufWriter::new(File::create(&path)?);
                    map.dump_to(&mut writer)?;
                    writer.flush()?;
                }
                None => {
                    let mut stdout = io::stdout().lock();
                    map.dump_to(&mut stdout)?;
                }
            }
        }
    }
    Ok(())
}

//===========================================================================//
