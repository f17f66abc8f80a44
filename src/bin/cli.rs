use clap::{Args, Parser, Subcommand};
use deptsite_core::{
    cli::{
        db::{db_migrate, db_revert},
        perm, user,
    },
    core::db::init_pool,
    settings::get_config,
};

#[derive(Parser)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database related command
    Db(DbArgs),
    /// Permission related command
    Perm(PermArgs),
    /// User related command
    User(UserArgs),
}

#[derive(Debug, Args)]
struct DbArgs {
    #[command(subcommand)]
    command: DbCommands,
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Run all pending migration
    Migrate,
    /// Revert all migration
    Revert,
}

#[derive(Debug, Args)]
struct PermArgs {
    #[command(subcommand)]
    command: PermCommands,
}

#[derive(Debug, Subcommand)]
enum PermCommands {
    /// Register builtin permission definitions (idempotent)
    Register,
    /// List the permission catalog
    Catalog {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        page_size: Option<u32>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, default_value_t = false)]
        all: bool,
    },
    /// Grant a permission to a user
    Grant {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        codename: String,
        #[arg(long)]
        by: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Revoke a permission from a user
    Revoke {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        codename: String,
        #[arg(long)]
        by: Option<String>,
    },
    /// Check whether a user holds a permission
    Check {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        codename: String,
    },
    /// List all active permissions a user holds
    List {
        #[arg(short, long)]
        email: String,
    },
}

#[derive(Debug, Args)]
struct UserArgs {
    #[command(subcommand)]
    command: UserCommands,
}

#[derive(Debug, Subcommand)]
enum UserCommands {
    /// Create new user
    Create {
        #[arg(short, long)]
        email: String,
        /// faculty / staff / officer / club_member
        #[arg(short, long)]
        role: Option<String>,
        #[arg(long, default_value_t = false)]
        power_user: bool,
        #[arg(long, default_value_t = false)]
        superuser: bool,
    },
}

#[tokio::main]
async fn main() {
    // Logging to File
    let file_appender = tracing_appender::rolling::daily("./logs", "cli.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let cli = Cli::parse();
    let _ = dotenvy::dotenv();
    let config = get_config();
    let pool = init_pool(&config).await;
    match &cli.command {
        Commands::Db(db_args) => match &db_args.command {
            DbCommands::Migrate => {
                println!("run all pending migration on {}", config.database_url);
                db_migrate(&pool).await.unwrap();
            }
            DbCommands::Revert => {
                println!("revert migration on {}", config.database_url);
                db_revert(&pool).await.unwrap();
            }
        },
        Commands::Perm(perm_args) => match &perm_args.command {
            PermCommands::Register => {
                perm::register(&pool).await.unwrap();
            }
            PermCommands::Catalog {
                page,
                page_size,
                search,
                category,
                all,
            } => {
                let category = category
                    .as_deref()
                    .map(|c| c.parse().expect("invalid category"));
                perm::catalog_list(&pool, *page, *page_size, search.clone(), category, *all)
                    .await
                    .unwrap();
            }
            PermCommands::Grant {
                email,
                codename,
                by,
                notes,
            } => {
                perm::grant(&pool, email, codename, by.as_deref(), notes.clone())
                    .await
                    .unwrap();
            }
            PermCommands::Revoke {
                email,
                codename,
                by,
            } => {
                perm::revoke(&pool, email, codename, by.as_deref())
                    .await
                    .unwrap();
            }
            PermCommands::Check { email, codename } => {
                perm::check(&pool, email, codename).await.unwrap();
            }
            PermCommands::List { email } => {
                perm::list(&pool, email).await.unwrap();
            }
        },
        Commands::User(user_args) => match &user_args.command {
            UserCommands::Create {
                email,
                role,
                power_user,
                superuser,
            } => {
                let role = role.as_deref().map(|r| r.parse().expect("invalid role"));
                user::create_user(&pool, email, role, *power_user, *superuser)
                    .await
                    .unwrap();
            }
        },
    }
}
