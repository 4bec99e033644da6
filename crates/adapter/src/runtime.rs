//! Adapter runtime.
//!
//! A single cooperative loop: inbound lines and the fixed-timestep tick are multiplexed
//! with `tokio::select!`, so the session is only ever touched from one place. Events
//! are flushed after every placement and every tick.

use std::time::Duration;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::core::ColoringPolicy;
use crate::engine::Session;
use crate::protocol::{
    parse_line, AckMessage, ClientMessage, ErrorMessage, EventMessage, EventPayload,
    ObservationMessage, ServerMessage,
};
use crate::types::TICK_MS;

/// Counters reported when the loop ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub lines: u64,
    pub rejected_lines: u64,
    pub ticks: u64,
    pub events: u64,
}

async fn send<W: AsyncWrite + Unpin>(writer: &mut W, msg: &ServerMessage) -> Result<()> {
    let mut buf = serde_json::to_vec(msg)?;
    buf.push(b'\n');
    writer.write_all(&buf).await?;
    Ok(())
}

async fn flush_events<P, W>(session: &mut Session<P>, writer: &mut W, stats: &mut RunStats) -> Result<()>
where
    P: ColoringPolicy,
    W: AsyncWrite + Unpin,
{
    for event in session.take_events() {
        stats.events += 1;
        let msg = ServerMessage::Event(EventMessage {
            event: EventPayload::from(&event),
        });
        send(writer, &msg).await?;
    }
    Ok(())
}

fn observation<P: ColoringPolicy>(session: &Session<P>, seq: Option<u64>) -> ServerMessage {
    let current = session
        .current()
        .colors()
        .iter()
        .map(|c| c.as_str())
        .collect();
    ServerMessage::Observation(ObservationMessage::from_snapshot(
        seq,
        &session.snapshot(),
        current,
    ))
}

async fn handle_line<P, W>(
    session: &mut Session<P>,
    line: &str,
    writer: &mut W,
    stats: &mut RunStats,
) -> Result<()>
where
    P: ColoringPolicy,
    W: AsyncWrite + Unpin,
{
    let line = line.trim();
    if line.is_empty() {
        return Ok(());
    }
    stats.lines += 1;

    match parse_line(line) {
        Ok(ClientMessage::Place { seq, column }) => {
            let result = session.drop_current(column);
            send(writer, &ServerMessage::Ack(AckMessage::from_result(seq, &result))).await?;
            flush_events(session, writer, stats).await?;
        }
        Ok(ClientMessage::Observe { seq }) => {
            send(writer, &observation(session, Some(seq))).await?;
        }
        Err(err) => {
            stats.rejected_lines += 1;
            warn!(code = err.code(), "rejected line: {err}");
            send(writer, &ServerMessage::Error(ErrorMessage::from_protocol(line, &err))).await?;
        }
    }
    Ok(())
}

/// Serve `session` over a line stream until input ends and the cascade is idle
pub async fn run<P, R, W>(session: &mut Session<P>, reader: R, mut writer: W) -> Result<RunStats>
where
    P: ColoringPolicy,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    info!("adapter running");
    let mut stats = RunStats::default();
    let mut lines = reader.lines();
    let mut input_open = true;

    let mut interval = tokio::time::interval(Duration::from_millis(u64::from(TICK_MS)));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            line = lines.next_line(), if input_open => {
                match line? {
                    Some(line) => handle_line(session, &line, &mut writer, &mut stats).await?,
                    None => {
                        debug!("input closed");
                        input_open = false;
                    }
                }
            }
            _ = interval.tick() => {
                session.tick(TICK_MS);
                stats.ticks += 1;
                flush_events(session, &mut writer, &mut stats).await?;
                if !input_open && session.is_idle() {
                    break;
                }
            }
        }
        writer.flush().await?;
    }

    send(&mut writer, &observation(session, None)).await?;
    writer.flush().await?;
    info!(
        lines = stats.lines,
        rejected = stats.rejected_lines,
        ticks = stats.ticks,
        "adapter stopped"
    );
    Ok(stats)
}
