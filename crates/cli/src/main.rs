use clap::{Parser, Subcommand};
use pdfstore_core::{storage_dir_from_env_value, DEFAULT_LOG_DIRECTIVES, STORAGE_DIR_ENV};
use pdfstore_files::{FileStore, StoreRequest, PDF_MEDIA_TYPE};
use std::error::Error;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "pdfstore")]
#[command(about = "Store and retrieve PDFs directly in a PDF store storage root")]
struct Cli {
    /// Storage root (created if missing)
    #[arg(long, env = STORAGE_DIR_ENV, global = true)]
    storage_dir: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Store a PDF under folder1/folder2/folder3/file_name.pdf
    Store {
        folder1: String,
        folder2: String,
        folder3: String,
        /// File name without the .pdf extension
        file_name: String,
        /// Path of the file to upload
        path: PathBuf,
        /// Declared media type of the file
        #[arg(long, default_value = PDF_MEDIA_TYPE)]
        media_type: String,
    },
    /// Retrieve a stored PDF by location
    Retrieve {
        /// Location as printed by `store`, e.g. /acct123/2024/invoices/inv-001.pdf
        location: String,
        /// Write to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    let filter = DEFAULT_LOG_DIRECTIVES
        .iter()
        .try_fold(EnvFilter::from_default_env(), |filter, directive| {
            Ok::<_, Box<dyn Error>>(filter.add_directive(directive.parse()?))
        })?;
    // stdout carries retrieved PDF bytes, so logs go to stderr
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    run(Cli::parse())
}

/// Runs one command. The storage root is only opened (and created) when a command needs it.
fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let open_store = || FileStore::new(&storage_dir_from_env_value(cli.storage_dir.clone()));

    match cli.command {
        Some(Commands::Store {
            folder1,
            folder2,
            folder3,
            file_name,
            path,
            media_type,
        }) => {
            let payload = std::fs::read(&path)?;
            let stored = open_store()?.store(StoreRequest {
                folder1: Some(folder1),
                folder2: Some(folder2),
                folder3: Some(folder3),
                file_name: Some(file_name),
                payload: Some(payload),
                media_type: Some(media_type),
            })?;
            println!("Stored {} bytes at {}", stored.size_bytes, stored.location);
        }
        Some(Commands::Retrieve { location, out }) => {
            let bytes = open_store()?.retrieve(&location)?;
            match out {
                Some(out) => {
                    std::fs::write(&out, &bytes)?;
                    println!("Wrote {} bytes to {}", bytes.len(), out.display());
                }
                None => std::io::stdout().write_all(&bytes)?,
            }
        }
        None => {
            println!("Use 'pdfstore --help' for commands");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_store_defaults_media_type() {
        let cli = Cli::try_parse_from([
            "pdfstore",
            "--storage-dir",
            "/tmp/pdfs",
            "store",
            "acct123",
            "2024",
            "invoices",
            "inv-001",
            "inv-001.pdf",
        ])
        .unwrap();

        assert_eq!(cli.storage_dir.as_deref(), Some("/tmp/pdfs"));
        match cli.command {
            Some(Commands::Store {
                file_name,
                media_type,
                ..
            }) => {
                assert_eq!(file_name, "inv-001");
                assert_eq!(media_type, "application/pdf");
            }
            _ => panic!("expected store command"),
        }
    }

    #[test]
    fn test_parse_retrieve_with_out() {
        let cli = Cli::try_parse_from([
            "pdfstore",
            "retrieve",
            "/a/b/c/d.pdf",
            "--out",
            "d.pdf",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Retrieve { location, out }) => {
                assert_eq!(location, "/a/b/c/d.pdf");
                assert_eq!(out, Some(PathBuf::from("d.pdf")));
            }
            _ => panic!("expected retrieve command"),
        }
    }

    #[test]
    fn test_store_rejects_missing_positional() {
        assert!(Cli::try_parse_from(["pdfstore", "store", "a", "b", "c"]).is_err());
    }

    #[test]
    fn test_no_command_leaves_storage_root_alone() {
        let temp = tempfile::TempDir::new().unwrap();
        let root = temp.path().join("not-yet");
        let cli = Cli::try_parse_from(["pdfstore", "--storage-dir", root.to_str().unwrap()])
            .unwrap();

        run(cli).unwrap();

        assert!(!root.exists());
    }

    #[test]
    fn test_store_command_creates_storage_root() {
        let temp = tempfile::TempDir::new().unwrap();
        let root = temp.path().join("created");
        let input = temp.path().join("input.pdf");
        std::fs::write(&input, b"%PDF cli").unwrap();
        let cli = Cli::try_parse_from([
            "pdfstore",
            "--storage-dir",
            root.to_str().unwrap(),
            "store",
            "a",
            "b",
            "c",
            "d",
            input.to_str().unwrap(),
        ])
        .unwrap();

        run(cli).unwrap();

        assert_eq!(std::fs::read(root.join("a/b/c/d.pdf")).unwrap(), b"%PDF cli");
    }

    #[test]
    fn test_store_through_file_store() {
        let temp = tempfile::TempDir::new().unwrap();
        let store = FileStore::new(temp.path()).unwrap();

        let stored = store
            .store(StoreRequest {
                folder1: Some("a".into()),
                folder2: Some("b".into()),
                folder3: Some("c".into()),
                file_name: Some("d".into()),
                payload: Some(b"%PDF".to_vec()),
                media_type: Some(PDF_MEDIA_TYPE.into()),
            })
            .unwrap();

        assert_eq!(store.retrieve(&stored.location).unwrap(), b"%PDF");
    }
}
