//! Retrieval-augmented answering.
//!
//! One question moves through a fixed pipeline: embed the question, pull
//! the top-K chunks from the space, compose the message list (system
//! grounding + prior conversation + the question), and ask the chat model.
//! The question joins the session log before the pipeline runs and stays
//! there even when a later step fails; the answer is appended only on
//! success.

use std::io::{self, Write};

use crate::config::Config;
use crate::embedding::EmbeddingClient;
use crate::error::DocbotResult;
use crate::llm::{ApiMessage, ChatClient};
use crate::models::{ChatMessage, ChatRole, ScoredChunk};
use crate::session::Session;
use crate::store::SpaceStore;

/// System message grounding the model in the retrieved chunks.
fn system_message(context: &str) -> ApiMessage {
    let text = format!(
        "You are an intelligent agent trained on the uploaded documents.\n\
         - If the answer is not in the context, say: \"I could not find that information in the documents.\"\n\
         - Format answers in **Markdown**.\n\
         - Use lists, tables or code blocks where they fit.\n\
         Context:\n{context}"
    );
    ApiMessage::system(text)
}

/// Join retrieved chunk texts into the context block, best match first.
fn render_context(chunks: &[ScoredChunk]) -> String {
    chunks
        .iter()
        .map(|scored| scored.chunk.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Build the full message list: system grounding, then the prior
/// conversation, then the question as the final user message.
fn build_messages(context: &str, prior: &[ChatMessage], question: &str) -> Vec<ApiMessage> {
    let mut messages = Vec::with_capacity(prior.len() + 2);
    messages.push(system_message(context));
    for msg in prior {
        match msg.role {
            ChatRole::User => messages.push(ApiMessage::user(msg.content.clone())),
            ChatRole::Assistant => messages.push(ApiMessage::assistant(msg.content.clone())),
        }
    }
    messages.push(ApiMessage::user(question));
    messages
}

/// Answer one question against the store, recording the exchange in the
/// session.
pub async fn answer_question(
    session: &mut Session,
    store: &SpaceStore,
    embedder: &EmbeddingClient,
    chat: &ChatClient,
    top_k: usize,
    question: &str,
) -> DocbotResult<String> {
    session.push_user(question);

    let query_vec = embedder.embed_query(question).await?;
    let hits = store.query(&query_vec, top_k).await?;
    let context = render_context(&hits);

    // Everything before the question just pushed.
    let prior = &session.messages()[..session.len() - 1];
    let messages = build_messages(&context, prior, question);
    let answer = chat.complete(&messages).await?;

    session.push_assistant(answer.clone());
    Ok(answer)
}

/// Entry point for `docbot ask`.
pub async fn run_ask(
    config: &Config,
    space: &str,
    question: &str,
    model: Option<&str>,
) -> anyhow::Result<()> {
    let api_key = crate::config::api_key()?;
    let model = config.resolve_model(model)?;

    let store = match SpaceStore::load(config, space).await? {
        Some(store) => store,
        None => {
            println!(
                "No documents loaded in space '{}'. Add PDFs with 'docbot ingest'.",
                space
            );
            return Ok(());
        }
    };

    let embedder = EmbeddingClient::new(config, api_key.clone())?;
    let chat = ChatClient::new(config, api_key, model)?;
    let mut session = Session::new();

    let answer = answer_question(
        &mut session,
        &store,
        &embedder,
        &chat,
        config.retrieval.top_k,
        question,
    )
    .await?;
    store.close().await;

    println!("{}", answer);
    Ok(())
}

/// Entry point for `docbot chat`: a line-per-question REPL on stdin.
///
/// `exit`/`quit` ends the loop, `clear` starts a fresh session, empty
/// lines are ignored. The prompt is shown only when stdin is a TTY, so
/// piped input produces clean output.
pub async fn run_chat(config: &Config, space: &str, model: Option<&str>) -> anyhow::Result<()> {
    let api_key = crate::config::api_key()?;
    let model = config.resolve_model(model)?;

    let store = match SpaceStore::load(config, space).await? {
        Some(store) => store,
        None => {
            println!(
                "No documents loaded in space '{}'. Add PDFs with 'docbot ingest'.",
                space
            );
            return Ok(());
        }
    };

    let embedder = EmbeddingClient::new(config, api_key.clone())?;
    let chat = ChatClient::new(config, api_key, model)?;
    let mut session = Session::new();

    let interactive = atty::is(atty::Stream::Stdin);
    if interactive {
        println!(
            "chat in space '{}' using {}. Type 'exit' to quit, 'clear' to start over.\n",
            space,
            chat.model()
        );
    }

    let stdin = io::stdin();
    loop {
        if interactive {
            print!("you > ");
            io::stdout().flush()?;
        }

        let mut buffer = String::new();
        if stdin.read_line(&mut buffer)? == 0 {
            break;
        }
        let trimmed = buffer.trim();

        if trimmed.eq_ignore_ascii_case("exit") || trimmed.eq_ignore_ascii_case("quit") {
            break;
        }
        if trimmed.eq_ignore_ascii_case("clear") {
            session = Session::new();
            if interactive {
                println!("session cleared\n");
            }
            continue;
        }
        if trimmed.is_empty() {
            continue;
        }

        match answer_question(
            &mut session,
            &store,
            &embedder,
            &chat,
            config.retrieval.top_k,
            trimmed,
        )
        .await
        {
            Ok(answer) => {
                println!("{}", answer);
                if interactive {
                    println!();
                }
            }
            Err(e) => eprintln!("error: {}", e),
        }
    }

    store.close().await;
    Ok(())
}
