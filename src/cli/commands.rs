use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "dome-chain")]
pub struct Opt {
    #[arg(long = "config", global = true, help = "Path to a TOML settings file")]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(name = "createaddress", about = "Generate a new random address")]
    CreateAddress,
    #[command(name = "send", about = "Queue a payment in the mempool")]
    Send {
        #[arg(help = "Sender address")]
        from: String,
        #[arg(help = "Recipient address")]
        to: String,
        #[arg(help = "Amount to send (in base units)")]
        amount: u64,
    },
    #[command(name = "listmempool", about = "Print every pending transaction")]
    ListMempool,
    #[command(
        name = "demo",
        about = "Mine a block, send coins to a friend, mine again and print the ledger"
    )]
    Demo,
    #[command(name = "minegenesis", about = "Mine a genesis block and print it as JSON")]
    MineGenesis {
        #[arg(long = "recipient", help = "Who receives the genesis reward")]
        recipient: Option<String>,
        #[arg(long = "reward", help = "Genesis reward (in base units)")]
        reward: Option<u64>,
        #[arg(long = "prefix", help = "Hex prefix the block hash must carry")]
        prefix: Option<String>,
    },
}
