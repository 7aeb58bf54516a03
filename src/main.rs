use anyhow::Result;
use clap::{Parser, Subcommand};
use packcheck::areas::repository::Repository;

#[derive(Parser)]
#[command(
    name = "packcheck",
    version = "0.1.0",
    about = "A packfile verification tool",
    long_about = "Verifies git packfiles: every entry is decoded, delta chains are \
    resolved against their bases, and each object's content hash is recomputed. \
    The result is a deterministic, hash-sorted listing of everything the pack holds.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "verify-pack",
        about = "Verify a packfile and list its contents",
        long_about = "This command verifies the integrity of a packfile and prints one line \
        per object, sorted by hash. The pack may be named by its content hash, by file \
        name, or by a path ending in .pack."
    )]
    VerifyPack {
        #[arg(index = 1, help = "The pack to verify (content hash, file name, or path)")]
        pack: String,
        #[arg(long, help = "Print a delta chain length distribution after the listing")]
        stats: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::VerifyPack { pack, stats } => {
            let pwd = std::env::current_dir()?;
            let repository =
                Repository::new(&pwd.to_string_lossy(), Box::new(std::io::stdout()))?;

            repository.verify_pack(pack, *stats)?
        }
    }

    Ok(())
}
