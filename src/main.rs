//! Nestling - print Lemmy comment threads in the terminal
#![allow(clippy::uninlined_format_args)]

use std::collections::HashSet;

use anyhow::Result;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use nestling::api::CommentSource;
use nestling::api::lemmy::LemmyClient;
use nestling::demo::{DEMO_POST_ID, DemoSource};
use nestling::{CommentForest, CommentId, CommentSort, Config, ThreadSession, VoteState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (RUST_LOG=debug for verbose output)
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match parse_args()? {
        Command::Thread {
            post_id,
            instance,
            sort,
        } => thread_cli(post_id, instance, sort).await,
        Command::Demo => run_demo().await,
        Command::Help => {
            print_help();
            Ok(())
        }
        Command::Version => {
            print_version();
            Ok(())
        }
    }
}

/// CLI commands
enum Command {
    Thread {
        post_id: i64,
        instance: Option<String>,
        sort: Option<CommentSort>,
    },
    Demo,
    Help,
    Version,
}

fn parse_args() -> Result<Command> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() == 1 {
        return Ok(Command::Help);
    }

    match args[1].as_str() {
        "-h" | "--help" | "help" => Ok(Command::Help),
        "-v" | "--version" | "version" => Ok(Command::Version),
        "--demo" | "demo" => Ok(Command::Demo),

        "thread" | "t" => {
            let post_id = args
                .get(2)
                .ok_or_else(|| anyhow::anyhow!("Missing post ID"))?
                .parse()
                .map_err(|_| anyhow::anyhow!("Post ID must be a number"))?;

            let flag = |long: &str, short: &str| {
                args.iter()
                    .position(|a| a == long || a == short)
                    .and_then(|i| args.get(i + 1))
                    .cloned()
            };

            let instance = flag("--instance", "-i");
            let sort = match flag("--sort", "-s") {
                Some(s) => Some(
                    CommentSort::from_str(&s)
                        .ok_or_else(|| anyhow::anyhow!("Unknown sort: {s}"))?,
                ),
                None => None,
            };

            Ok(Command::Thread {
                post_id,
                instance,
                sort,
            })
        }

        other => Err(anyhow::anyhow!(
            "Unknown command: {other}\nRun 'nestling --help' for usage"
        )),
    }
}

fn print_help() {
    let config_path = Config::default_path()
        .map_or_else(|_| "Unknown".to_string(), |p| p.display().to_string());

    println!(
        r#"🪺 Nestling - Lemmy comment threads in your terminal

USAGE:
    nestling [COMMAND]

COMMANDS:
    thread <post_id> [OPTIONS]         Print the comments of a post
      Options:
        -i, --instance <url>           Lemmy instance (default from config)
        -s, --sort <sort>              hot, top, new, old, controversial
      Examples:
        nestling thread 12345
        nestling thread 12345 --instance https://beehaw.org --sort top

    demo                               Print an offline demo thread
    help                               Show this help
    version                            Show version

CONFIG:
    {}
"#,
        config_path
    );
}

fn print_version() {
    println!("nestling {}", nestling::VERSION);
    println!("{}", nestling::REPO_URL);
}

async fn thread_cli(
    post_id: i64,
    instance: Option<String>,
    sort: Option<CommentSort>,
) -> Result<()> {
    let config = Config::load()?;
    let instance = instance.unwrap_or_else(|| config.instance.clone());
    let sort = sort.unwrap_or(config.default_sort);

    let client = LemmyClient::new(&instance, None).with_limits(config.max_depth, config.page_limit);
    let mut session = ThreadSession::open(client, post_id, sort).await?;

    load_unloaded(&mut session).await;

    println!("Post {} on {} ({} comments, {})\n", post_id, instance, session.forest().len(), sort);
    print_thread(session.forest(), config.wrap_width);
    Ok(())
}

async fn run_demo() -> Result<()> {
    let source = DemoSource::new();
    let mut session = ThreadSession::open(&source, DEMO_POST_ID, CommentSort::Hot).await?;

    load_unloaded(&mut session).await;

    session.toggle_collapsed(CommentId(6))?;
    session
        .vote(&source, CommentId(2), VoteState::Upvoted)
        .await?;

    println!("Demo thread ({} comments, {})\n", session.forest().len(), session.sort());
    print_thread(session.forest(), Config::default().wrap_width);
    Ok(())
}

/// Follow "more replies" links until every reported reply is loaded
async fn load_unloaded<S: CommentSource>(session: &mut ThreadSession<S>) {
    let mut attempted = HashSet::new();

    loop {
        let pending: Vec<CommentId> = session
            .visible()
            .map(|(node, _)| node.id())
            .filter(|id| {
                !attempted.contains(id)
                    && session.forest().unloaded_replies(*id).unwrap_or(0) > 0
            })
            .collect();

        if pending.is_empty() {
            break;
        }

        for id in pending {
            attempted.insert(id);
            if let Err(e) = session.load_more(id).await {
                tracing::warn!("Failed to load replies to {}: {}", id, e);
                return;
            }
        }
    }
}

fn print_thread(forest: &CommentForest, width: usize) {
    for (node, depth) in forest.visible_sequence() {
        let indent = "  ".repeat(depth);
        let comment = node.comment();

        let mut header = format!(
            "{}{} {} · {} · {}",
            indent,
            node.vote().glyph(),
            comment.score,
            comment.creator_name,
            comment.relative_time()
        );
        if node.is_collapsed() {
            let hidden = forest.descendant_count(node.id()).unwrap_or(0);
            header.push_str(&format!(" [+{hidden}]"));
        }
        println!("{header}");

        if node.is_collapsed() {
            continue;
        }

        let body = if comment.is_gone() {
            "[deleted]"
        } else {
            comment.content.as_str()
        };
        let body_indent = format!("{indent}  ");
        let options = textwrap::Options::new(width)
            .initial_indent(&body_indent)
            .subsequent_indent(&body_indent);
        println!("{}\n", textwrap::fill(body, options));
    }
}
