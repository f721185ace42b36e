//! One-shot subcommands that run without the TUI.
//!
//! They drive the same session and ingestion types as the chat screen and
//! write plain text to `out`.

use std::io::{Read, Write};
use std::path::Path;

use anyhow::{bail, Result};
use revi_client::{ReviewBackend, Source};
use tracing::info;

use crate::history::{HistoryState, HistoryView};
use crate::ingest::{FileIngest, IngestEvent, Status, TextIngest};
use crate::session::{ChatSession, Message, SubmitRejection};
use crate::strings;

pub async fn ask<W: Write>(backend: &dyn ReviewBackend, question: &str, out: &mut W) -> Result<()> {
    let mut session = ChatSession::new();
    match session.send_question(backend, question).await {
        Ok(()) => {}
        Err(SubmitRejection::Blank) => bail!("La pregunta está vacía"),
        Err(SubmitRejection::Busy) => bail!("Ya hay una pregunta en curso"),
    }

    if let Some(answer) = session.last_message() {
        write_answer(answer, out)?;
    }
    Ok(())
}

fn write_answer<W: Write>(message: &Message, out: &mut W) -> Result<()> {
    writeln!(out, "{} · {}", strings::APP_TITLE, message.time_label())?;
    writeln!(out, "{}", message.content)?;

    if message.has_sources() {
        writeln!(out)?;
        writeln!(out, "{} ({})", strings::SHOW_SOURCES, message.sources.len())?;
        write_sources(&message.sources, out)?;
    }
    Ok(())
}

fn write_sources<W: Write>(sources: &[Source], out: &mut W) -> Result<()> {
    for (i, source) in sources.iter().enumerate() {
        writeln!(out, "{:>2}. [{}]", i + 1, source.document_id)?;
        writeln!(out, "    {} {}", strings::SNIPPET_LABEL, source.content_snippet)?;
        writeln!(out, "    {} {}", strings::SIMILARITY_LABEL, source.score_label())?;
    }
    Ok(())
}

pub async fn history<W: Write>(backend: &dyn ReviewBackend, out: &mut W) -> Result<()> {
    let mut view = HistoryView::default();
    view.load(backend).await;

    match view.state {
        HistoryState::Loaded(entries) if entries.is_empty() => {
            writeln!(out, "{}", strings::HISTORY_EMPTY)?;
        }
        HistoryState::Loaded(entries) => {
            for entry in entries {
                writeln!(out, "[{}] {}", entry.role, entry.content)?;
            }
        }
        HistoryState::Failed(reason) => bail!("{}", reason),
        HistoryState::Idle | HistoryState::Loading => {}
    }
    Ok(())
}

pub async fn upload<W: Write>(backend: &dyn ReviewBackend, path: &Path, out: &mut W) -> Result<()> {
    let mut widget = FileIngest::default();
    if !widget.select(path) {
        return fail(widget.status());
    }

    match widget.upload(backend).await {
        Some(event) => report(event, strings::FILE_UPLOADED, out),
        None => fail(widget.status()),
    }
}

/// Upload `text`, or everything on stdin when it is absent.
pub async fn upload_text<W: Write>(
    backend: &dyn ReviewBackend,
    text: Option<String>,
    out: &mut W,
) -> Result<()> {
    let text = match text {
        Some(text) => text,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let mut widget = TextIngest::default();
    widget.input = text;
    info!("Uploading {}", strings::char_count(widget.char_count()));

    match widget.submit(backend).await {
        Some(event) => report(event, strings::TEXT_UPLOADED, out),
        None => fail(widget.status()),
    }
}

fn report<W: Write>(event: IngestEvent, done: &str, out: &mut W) -> Result<()> {
    let IngestEvent::Uploaded { ack, .. } = event;
    writeln!(out, "{}", done)?;
    if let Some(message) = ack.message() {
        writeln!(out, "{}", message)?;
    }
    Ok(())
}

fn fail(status: Option<&Status>) -> Result<()> {
    match status {
        Some(status) => bail!("{}", status.text()),
        None => bail!("{}", strings::TRY_AGAIN),
    }
}

pub async fn search<W: Write>(backend: &dyn ReviewBackend, query: &str, out: &mut W) -> Result<()> {
    let query = query.trim();
    if query.is_empty() {
        bail!("La búsqueda está vacía");
    }

    let results = backend.search(query).await?;
    if results.is_empty() {
        writeln!(out, "Sin resultados")?;
        return Ok(());
    }
    write_sources(&results, out)
}
