use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dialoguer::Confirm;
use dotenvy::dotenv;
use keystash_cache::{CacheConfig, RedisCache};
use keystash_cli::{parse_pair, parse_ttl, render_set, render_value};
use keystash_observability::init_logging;

#[derive(Parser)]
#[command(name = "keystash-cli")]
#[command(about = "Keystash CLI - Inspect and edit a Redis cache", long_about = None)]
struct Cli {
    /// Redis URL (overrides REDIS_URL)
    #[arg(long, global = true)]
    url: Option<String>,

    /// Key prefix (overrides CACHE_PREFIX)
    #[arg(long, global = true)]
    prefix: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check connectivity and show pool occupancy
    Ping,
    /// Read a text value
    Get { key: String },
    /// Store a text value
    Set {
        key: String,
        value: String,

        /// Expiry in seconds (0 = never)
        #[arg(short, long, value_parser = parse_ttl, default_value = "0")]
        ttl: Duration,
    },
    /// Append to a text value, creating it if missing
    Append { key: String, value: String },
    /// Delete one or more keys
    Del {
        #[arg(required = true)]
        keys: Vec<String>,
    },
    /// Check whether a key exists
    Exists { key: String },
    /// Show the remaining time-to-live of a key
    Ttl { key: String },
    /// Set (or with 0, clear) the expiry of a key
    Expire {
        key: String,
        #[arg(value_parser = parse_ttl)]
        ttl: Duration,
    },
    /// Read several text values
    Mget {
        #[arg(required = true)]
        keys: Vec<String>,
    },
    /// Store several KEY=VALUE pairs
    Mset {
        #[arg(required = true, value_parser = parse_pair)]
        pairs: Vec<(String, String)>,
    },
    /// Push values onto the tail of a list
    Rpush {
        key: String,
        #[arg(required = true)]
        values: Vec<String>,
    },
    /// Read a whole list
    Lrange { key: String },
    /// Add members to a set
    Sadd {
        key: String,
        #[arg(required = true)]
        members: Vec<String>,
    },
    /// Read all members of a set
    Smembers { key: String },
    /// Write FIELD=VALUE pairs into a hash
    Hset {
        key: String,
        #[arg(required = true, value_parser = parse_pair)]
        fields: Vec<(String, String)>,
    },
    /// Read every field of a hash
    Hgetall { key: String },
    /// Remove a field from a hash
    Hdel { key: String, field: String },
    /// Check whether a hash has a field
    Hexists { key: String, field: String },
    /// Delete every key matching a glob pattern (within the prefix)
    Purge { pattern: String },
    /// Remove ALL data from the Redis server
    Flush {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_logging();

    let cli = Cli::parse();

    let mut config = CacheConfig::from_env();
    if let Some(url) = cli.url {
        config = config.with_url(url);
    }
    if let Some(prefix) = cli.prefix {
        config = config.with_prefix(prefix);
    }

    let cache = match RedisCache::new(&config) {
        Ok(cache) => cache,
        Err(e) => {
            eprintln!("❌ Invalid Redis configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&cache, cli.command).await {
        eprintln!("\n❌ {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cache: &RedisCache, command: Commands) -> Result<()> {
    match command {
        Commands::Ping => handle_ping(cache).await,
        Commands::Get { key } => {
            let value = cache.get(&key).await?;
            println!("{}", render_value(value.as_deref()));
            Ok(())
        }
        Commands::Set { key, value, ttl } => {
            cache.set_with_ttl(&key, &value, ttl).await?;
            println!("OK");
            Ok(())
        }
        Commands::Append { key, value } => {
            println!("{}", cache.append(&key, &value).await?);
            Ok(())
        }
        Commands::Del { keys } => {
            let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
            println!("{}", cache.delete_many(&keys).await?);
            Ok(())
        }
        Commands::Exists { key } => {
            println!("{}", cache.exists(&key).await?);
            Ok(())
        }
        Commands::Ttl { key } => {
            match cache.ttl(&key).await? {
                Some(ttl) => println!("{}s", ttl.as_secs()),
                None => println!("(no expiry)"),
            }
            Ok(())
        }
        Commands::Expire { key, ttl } => {
            println!("{}", cache.expire(&key, ttl).await?);
            Ok(())
        }
        Commands::Mget { keys } => {
            let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
            for (key, value) in keys.iter().zip(cache.get_many(&keys).await?) {
                println!("{} = {}", key, render_value(value.as_deref()));
            }
            Ok(())
        }
        Commands::Mset { pairs } => {
            let pairs: Vec<(&str, &str)> = pairs
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect();
            cache.set_many(&pairs).await?;
            println!("OK");
            Ok(())
        }
        Commands::Rpush { key, values } => {
            println!("{}", cache.append_list(&key, &values).await?);
            Ok(())
        }
        Commands::Lrange { key } => {
            let values = cache.get_list(&key).await?;
            println!("{}", serde_json::to_string_pretty(&values)?);
            Ok(())
        }
        Commands::Sadd { key, members } => {
            let members: Vec<&str> = members.iter().map(String::as_str).collect();
            println!("{}", cache.append_set(&key, &members).await?);
            Ok(())
        }
        Commands::Smembers { key } => {
            let members = cache.get_set(&key).await?;
            println!("{}", render_set(&members)?);
            Ok(())
        }
        Commands::Hset { key, fields } => {
            let fields: Vec<(&str, &str)> = fields
                .iter()
                .map(|(f, v)| (f.as_str(), v.as_str()))
                .collect();
            cache.append_map(&key, &fields).await?;
            println!("OK");
            Ok(())
        }
        Commands::Hgetall { key } => {
            let fields: HashMap<String, String> = cache.get_map(&key).await?;
            let sorted: std::collections::BTreeMap<_, _> = fields.into_iter().collect();
            println!("{}", serde_json::to_string_pretty(&sorted)?);
            Ok(())
        }
        Commands::Hdel { key, field } => {
            println!("{}", cache.remove_map_field(&key, &field).await?);
            Ok(())
        }
        Commands::Hexists { key, field } => {
            println!("{}", cache.has_map_field(&key, &field).await?);
            Ok(())
        }
        Commands::Purge { pattern } => {
            let deleted = cache.delete_matching(&pattern).await?;
            println!("✅ Deleted {} keys", deleted);
            Ok(())
        }
        Commands::Flush { yes } => handle_flush(cache, yes).await,
    }
}

async fn handle_ping(cache: &RedisCache) -> Result<()> {
    let pong = cache.ping().await.context("Redis did not answer PING")?;
    let status = cache.pool_status();

    println!("{}", if pong { "PONG" } else { "unexpected reply" });
    println!(
        "   Pool: {} open / {} max, {} idle, {} waiting",
        status.size, status.max_size, status.available, status.waiting
    );
    Ok(())
}

async fn handle_flush(cache: &RedisCache, yes: bool) -> Result<()> {
    let confirmed = yes
        || Confirm::new()
            .with_prompt("This deletes every key on the Redis server. Continue?")
            .default(false)
            .interact()
            .context("Failed to read confirmation")?;

    if !confirmed {
        println!("Aborted");
        return Ok(());
    }

    cache.flush_all().await?;
    println!("✅ Flushed all data");
    Ok(())
}
