//! Line-oriented console front-end
//!
//! Prints view events as they arrive and parses operator commands into
//! controller commands. The console holds only display copies of the
//! latest view values; all authoritative state stays in the controller.

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{broadcast, mpsc};
use tracing::{error, info, warn};

use crate::sync::{ControlCommand, ViewEvent};
use crate::view::{SnapshotView, StatusView};

pub struct ConsoleApp {
    cmd_tx: mpsc::Sender<ControlCommand>,
    view_rx: broadcast::Receiver<ViewEvent>,
    last_snapshot: Option<SnapshotView>,
}

impl ConsoleApp {
    pub fn new(
        cmd_tx: mpsc::Sender<ControlCommand>,
        view_rx: broadcast::Receiver<ViewEvent>,
    ) -> Self {
        Self {
            cmd_tx,
            view_rx,
            last_snapshot: None,
        }
    }

    /// Run the console event loop (blocks until quit)
    pub async fn run(mut self) -> Result<()> {
        info!("Starting console loop");
        println!("relay-console ready (type help for commands)");

        let stdin = tokio::io::stdin();
        let mut lines = BufReader::new(stdin).lines();

        loop {
            tokio::select! {
                event = self.view_rx.recv() => {
                    match event {
                        Ok(event) => self.handle_event(event),
                        Err(broadcast::error::RecvError::Lagged(n)) => {
                            warn!("Missed {} view updates", n);
                        }
                        Err(broadcast::error::RecvError::Closed) => {
                            info!("View channel closed, exiting console");
                            break;
                        }
                    }
                }
                line = lines.next_line() => {
                    match line {
                        Ok(Some(line)) => {
                            if !self.handle_line(line.trim()).await {
                                break;
                            }
                        }
                        Ok(None) => {
                            info!("Console input closed");
                            self.send_cmd(ControlCommand::Shutdown).await;
                            break;
                        }
                        Err(e) => {
                            error!("Failed to read console input: {}", e);
                            break;
                        }
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Interrupt received, shutting down");
                    self.send_cmd(ControlCommand::Shutdown).await;
                    break;
                }
            }
        }

        info!("Console loop exited");
        Ok(())
    }

    /// Render one view event
    fn handle_event(&mut self, event: ViewEvent) {
        match event {
            ViewEvent::Snapshot(snapshot) => {
                print_snapshot(&snapshot);
                self.last_snapshot = Some(snapshot);
            }
            ViewEvent::Status(status) => {
                print_status(&status);
                if let Some(snapshot) = self.last_snapshot.as_mut() {
                    snapshot.status = status;
                }
            }
            ViewEvent::Notice(text) => println!("{}", text),
        }
    }

    /// Parse one input line; returns false when the console should exit
    async fn handle_line(&mut self, line: &str) -> bool {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&command, args)) = words.split_first() else {
            return true;
        };

        match command {
            "help" => print_commands(),
            "show" => match &self.last_snapshot {
                Some(snapshot) => print_snapshot(snapshot),
                None => println!("No state loaded yet"),
            },
            "load" => self.send_cmd(ControlCommand::Reload).await,
            "set" => match args.split_first() {
                Some((&name, value)) => {
                    self.send_cmd(ControlCommand::SetField {
                        name: name.to_string(),
                        value: value.join(" "),
                    })
                    .await;
                }
                None => println!("Usage: set <field> <value>"),
            },
            "channel" => match args {
                [index, name, value @ ..] => match index.parse::<usize>() {
                    Ok(index) => {
                        self.send_cmd(ControlCommand::SetChannelField {
                            index,
                            name: name.to_string(),
                            value: value.join(" "),
                        })
                        .await;
                    }
                    Err(_) => println!("Channel index must be a number"),
                },
                _ => println!("Usage: channel <index> <id|name|url> <value>"),
            },
            "add" => self.send_cmd(ControlCommand::AddChannel).await,
            "active" => match args.first() {
                Some(id) => {
                    self.send_cmd(ControlCommand::SelectChannel { id: id.to_string() })
                        .await;
                }
                None => println!("Usage: active <channel-id>"),
            },
            "save" => self.send_cmd(ControlCommand::Save).await,
            "start" => self.send_cmd(ControlCommand::StartRelay).await,
            "stop" => self.send_cmd(ControlCommand::StopRelay).await,
            "quit" => {
                self.send_cmd(ControlCommand::Shutdown).await;
                return false;
            }
            other => println!("Unknown command: {} (type help)", other),
        }

        true
    }

    async fn send_cmd(&self, cmd: ControlCommand) {
        if let Err(e) = self.cmd_tx.send(cmd).await {
            error!("Failed to send command: {}", e);
        }
    }
}

fn print_commands() {
    println!("Commands:");
    println!("  show                              Print current config and status");
    println!("  load                              Re-fetch state from the server");
    println!("  set <field> <value>               Edit a config field");
    println!("  channel <index> <field> <value>   Edit a channel row (id, name, url)");
    println!("  add                               Append a new channel row");
    println!("  active <id>                       Mark a channel as active");
    println!("  save                              Push the form to the server");
    println!("  start | stop                      Control the relay process");
    println!("  quit                              Exit the console");
}

fn print_snapshot(snapshot: &SnapshotView) {
    let form = &snapshot.form;
    println!();
    println!("Config:");
    println!("  source_url           = {}", form.source_url);
    println!("  preset               = {}", form.preset);
    println!("  hls_time             = {}", form.hls_time);
    println!("  buffer_minutes       = {}", form.buffer_minutes);
    println!("  player_delay_seconds = {}", form.player_delay_seconds);
    println!("  ffmpeg_threads       = {}", form.ffmpeg_threads);
    println!("  video_bitrate        = {}", form.video_bitrate);
    println!("  audio_bitrate        = {}", form.audio_bitrate);

    if form.channels.is_empty() {
        println!("  (no channels)");
    } else {
        println!("  Channels:");
        for (idx, row) in form.channels.iter().enumerate() {
            let marker = if form.active_channel.as_deref() == Some(row.id.as_str()) {
                "*"
            } else {
                " "
            };
            println!("  {} [{}] {} | {} | {}", marker, idx, row.id, row.name, row.url);
        }
    }

    print_status(&snapshot.status);
}

fn print_status(status: &StatusView) {
    let verdict = if status.healthy { "healthy" } else { "unhealthy" };
    println!("Status: {} [{}]", status.headline, verdict);
    println!(
        "  uptime: {}s  segments: {}  playlist age: {}  buffer: {}",
        status.uptime_seconds, status.segment_count, status.playlist_age, status.effective_buffer
    );
    if let Some(error) = &status.last_error {
        println!("  last error: {}", error);
    }
}
