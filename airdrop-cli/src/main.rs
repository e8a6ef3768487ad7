use std::fs::File;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use merkle_tree::AirdropMerkleTree;

#[derive(Parser)]
#[command(name = "airdrop-cli")]
#[command(about = "Build airdrop Merkle trees and extract claim proofs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a Merkle tree from a CSV entitlement list
    Build {
        /// Input CSV with `claimant,amount` rows (hex addresses, UI amounts)
        #[arg(short, long)]
        input: PathBuf,

        /// Output JSON file for the tree, including per-claimant proofs
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Print the Merkle root of a built tree
    Root {
        /// Tree JSON file produced by `build`
        #[arg(short, long)]
        tree: PathBuf,
    },
    /// Print the leaf index and proof for one claimant
    Proof {
        /// Tree JSON file produced by `build`
        #[arg(short, long)]
        tree: PathBuf,

        /// Hex-encoded 32-byte claimant address
        #[arg(short, long)]
        claimant: String,
    },
}

fn load_tree(path: &PathBuf) -> Result<AirdropMerkleTree> {
    let file = File::open(path).context("Failed to open tree file")?;
    serde_json::from_reader(file).context("Failed to parse tree file")
}

fn parse_claimant(input: &str) -> Result<[u8; 32]> {
    let hex_str = input.strip_prefix("0x").unwrap_or(input);
    let mut claimant = [0u8; 32];
    if hex::decode_to_slice(hex_str, &mut claimant).is_err() {
        bail!("claimant must be a hex-encoded 32-byte address");
    }
    Ok(claimant)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { input, output } => {
            let tree = AirdropMerkleTree::new_from_csv(&input)
                .context("Failed to build tree from CSV")?;
            // every stored proof goes through the on-chain verifier before
            // the tree is written anywhere
            tree.verify_proofs().context("Self-verification failed")?;

            let file = File::create(&output).context("Failed to create output file")?;
            serde_json::to_writer_pretty(file, &tree).context("Failed to write tree")?;

            println!("Merkle root: 0x{}", hex::encode(tree.merkle_root));
            println!("Entitlements: {}", tree.max_num_nodes);
            println!("Total claim: {}", tree.max_total_claim);
        }
        Commands::Root { tree } => {
            let tree = load_tree(&tree)?;
            println!("0x{}", hex::encode(tree.merkle_root));
        }
        Commands::Proof { tree, claimant } => {
            let tree = load_tree(&tree)?;
            let claimant = parse_claimant(&claimant)?;
            let node = tree
                .get_node(&claimant)
                .context("Claimant not found in tree")?;
            let proof = tree.get_proof(&claimant)?;

            println!("index: {}", proof.index);
            println!("amount: {}", node.amount);
            println!("proof: 0x{}", hex::encode(proof.to_bytes()));
        }
    }

    Ok(())
}
