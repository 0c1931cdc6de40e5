//! EdgeKit operator console.
//!
//! Uploads an optional job-configuration file, connects to the device's
//! monitoring channel, prints live status, and drives the end-run /
//! end-job confirmation flow from stdin commands.

use anyhow::{Context, Result};
use edgekit::{
    init_logging, DeviceConfig, JobSession, JobUploader, SessionEvent, SessionState, VERSION,
};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

fn print_help() {
    println!("Commands:");
    println!("  end      open the end-run confirmation dialog");
    println!("  cancel   dismiss the dialog and keep monitoring");
    println!("  confirm  confirm ending the current run");
    println!("  job      end the whole job and exit");
    println!("  run      end this run, then upload a new config to start another");
    println!("  help     show this message");
    println!("  quit     exit without touching the device");
}

async fn run() -> Result<()> {
    let config = DeviceConfig::load_default();
    config.validate().context("invalid device configuration")?;

    println!("EdgeKit {} targeting {}", VERSION, config.host);

    // An optional first argument is a job config to upload before monitoring
    if let Some(arg) = std::env::args().nth(1) {
        let path = PathBuf::from(arg);
        let uploader = JobUploader::new(&config);
        let ack = uploader
            .upload(&path)
            .await
            .with_context(|| format!("uploading {}", path.display()))?;
        println!(
            "Upload accepted: {}",
            ack.message.as_deref().unwrap_or("(no message)")
        );
    }

    let session = JobSession::new(config);
    let mut events = session.subscribe();
    session.connect().await.context("connecting to device")?;
    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            event = events.recv() => {
                let event = match event {
                    Ok(event) => event,
                    Err(_) => break,
                };
                match event {
                    SessionEvent::SnapshotUpdated { check_key, job_continuing } => {
                        if job_continuing {
                            println!("status: job continues");
                        } else {
                            println!("status: {}", check_key);
                        }
                        if let Some(snapshot) = session.snapshot() {
                            println!(
                                "  quality control: {}  tool: {}",
                                snapshot.quality_control(),
                                snapshot.tool_status()
                            );
                            let detail = snapshot.check_detail();
                            println!("  site environment: {}", detail.site_environment);
                            println!("  recommended action: {}", detail.recommended_action);
                        }
                    }
                    SessionEvent::SnapshotRejected(reason) => {
                        println!("status message dropped: {}", reason);
                    }
                    SessionEvent::StateChanged(state) => {
                        tracing::debug!("Session state: {}", state);
                    }
                    SessionEvent::Connected(address) => {
                        println!("Monitoring {}", address);
                    }
                    SessionEvent::Disconnected => {
                        println!("Disconnected from device");
                        if session.state() == SessionState::Terminated {
                            break;
                        }
                    }
                    SessionEvent::Error(message) => {
                        eprintln!("error: {}", message);
                    }
                }
            }
            line = lines.next_line() => {
                let Some(line) = line.context("reading stdin")? else { break };
                match line.trim() {
                    "end" => report(session.open_end_dialog().map(|_| {
                        "End this run? 'confirm' or 'cancel'".to_string()
                    })),
                    "cancel" => report(session.cancel_end_dialog().map(|_| {
                        "Dialog dismissed, still monitoring".to_string()
                    })),
                    "confirm" => report(session.confirm_end_run().map(|_| {
                        "Run will end. 'job' to finish the job, 'run' to start another".to_string()
                    })),
                    "job" => {
                        report(session.end_job().await.map(|_| "Job ended".to_string()));
                        if session.state() == SessionState::Terminated {
                            break;
                        }
                    }
                    "run" => {
                        report(session.start_new_run().await.map(|_| {
                            "Run ended. Upload a new job config to start the next run".to_string()
                        }));
                        if session.state() == SessionState::Idle {
                            break;
                        }
                    }
                    "help" => print_help(),
                    "quit" => break,
                    "" => {}
                    other => println!("unknown command '{}', try 'help'", other),
                }
            }
        }
    }

    Ok(())
}

fn report(outcome: edgekit::Result<String>) {
    match outcome {
        Ok(message) => println!("{}", message),
        Err(e) => eprintln!("error: {}", e),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;
    run().await
}
