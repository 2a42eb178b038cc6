// Entry point for the ledger CLI
// The chain itself lives only in memory; the mempool is the one thing kept on disk
use clap::Parser;
use dome_chain::core::monetary::conversions::format_coins;
use dome_chain::core::monetary::{GENESIS_REWARD_RECIPIENT, SATOSHIS_PER_COIN};
use dome_chain::utils::short_hash;
use dome_chain::{
    generate_address, validate_prefix, Blockchain, Command, Config, Mempool, Miner, Opt,
    ProofOfWork,
};
use log::{error, LevelFilter};
use std::process;

fn main() {
    env_logger::builder().filter_level(LevelFilter::Info).init();

    let opt = Opt::parse();

    if let Err(e) = run(opt) {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn run(opt: Opt) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load(opt.config.as_deref())?;

    match opt.command {
        Command::CreateAddress => {
            println!("Your new address: {}", generate_address());
        }
        Command::Send { from, to, amount } => {
            if amount == 0 {
                return Err("Amount must be positive".into());
            }
            let mut mempool = Mempool::new(&config.mempool_path);
            let session = mempool.open()?;
            let transaction = session.create_transaction(&from, &to, amount)?;
            println!("Queued {}", transaction.hash());
        }
        Command::ListMempool => {
            let mut mempool = Mempool::new(&config.mempool_path);
            let session = mempool.open()?;
            print_mempool(&session)?;
        }
        Command::Demo => run_demo(&config)?,
        Command::MineGenesis {
            recipient,
            reward,
            prefix,
        } => {
            let prefix = prefix.unwrap_or_else(|| config.hash_prefix.clone());
            validate_prefix(&prefix)?;
            let recipient = recipient.unwrap_or_else(|| GENESIS_REWARD_RECIPIENT.to_string());
            let reward = reward.unwrap_or(config.block_reward);
            let block = ProofOfWork::mine_genesis(&recipient, reward, &prefix);
            println!("{}", serde_json::to_string_pretty(&block)?);
        }
    }
    Ok(())
}

fn print_mempool(mempool: &Mempool) -> Result<(), Box<dyn std::error::Error>> {
    let mut empty = true;
    for transaction in mempool.iter()? {
        let transaction = transaction?;
        println!(
            "{} -> {} +{}",
            transaction.get_sender(),
            transaction.get_recipient(),
            format_coins(transaction.get_amount())
        );
        empty = false;
    }
    if empty {
        println!("(empty)");
    }
    Ok(())
}

fn print_chain(blockchain: &Blockchain) {
    for block in blockchain.get_blocks() {
        println!("---- block {} ----", short_hash(block.get_hash()));
        for transaction in block.get_transactions() {
            for output in transaction.get_outputs() {
                println!(
                    "{} +{}",
                    output.get_recipient(),
                    format_coins(output.get_amount())
                );
            }
        }
    }
}

// The whole lifecycle in one go: mine, pay a friend, mine again, show the result
fn run_demo(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let wallet = config.mining_address.clone().unwrap_or_else(generate_address);
    let friend = generate_address();
    println!("wallet: {wallet}");
    println!("friend: {friend}");
    println!();

    let mut chain = config.new_blockchain();
    let miner = Miner::with_config(&wallet, config.miner_config());
    let mut mempool = Mempool::new(&config.mempool_path);

    {
        let pool = mempool.open()?;

        println!("mining new block...");
        let block = miner.mine(&pool, &chain)?;
        chain.add_block(block)?;
        println!("done!");
        println!();

        println!("sending 20 DPC to friend...");
        pool.create_transaction(&wallet, &friend, 20 * SATOSHIS_PER_COIN)?;
        println!();
        println!("mempool:");
        print_mempool(&pool)?;
        println!();

        println!("mining new block...");
        let block = miner.mine(&pool, &chain)?;
        chain.add_block(block)?;
        println!("done!");
        println!();

        println!("mempool:");
        print_mempool(&pool)?;
        println!();
        println!("closing mempool...");
    }
    println!();

    println!("full chain:");
    print_chain(&chain);
    println!();

    println!("UTXOs:");
    for utxo in chain.iter_utxos() {
        println!(
            "output #{} of transaction {} ({})",
            utxo.get_output_index(),
            short_hash(utxo.get_transaction()),
            format_coins(utxo.get_amount())
        );
    }
    println!();

    println!("balances:");
    for (address, balance) in chain.balances() {
        println!("{address} has {}", format_coins(balance));
    }
    Ok(())
}
