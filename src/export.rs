//! Async export facade.
//!
//! A dedicated worker thread owns the capture and page backends and executes
//! one export at a time; async callers talk to it over a command channel so
//! the backends never need to be `Sync`.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread;

use tokio::sync::oneshot;

use crate::pdf::PdfPageWriter;
use crate::rendering::raster::SlipRaster;
use crate::rendering::ReceiptDocument;
use crate::{CaptureBackend, Error, ExportConfig, PageBackend, Result};

/// File name a slip is saved under: the fixed prefix plus the room number.
pub fn slip_file_name(room_number: &str) -> String {
    format!("ใบเสร็จห้อง{room_number}.pdf")
}

enum Command {
    Export(ReceiptDocument, oneshot::Sender<Result<PathBuf>>),
    Close(oneshot::Sender<Result<()>>),
}

/// An async handle to the export worker.
///
/// Clones share the worker and its single-export-at-a-time guard: while one
/// export runs, further [`Exporter::export`] calls fail fast with
/// [`Error::ExportBusy`] instead of queueing.
#[derive(Clone, Debug)]
pub struct Exporter {
    cmd_tx: Sender<Command>,
    busy: Arc<AtomicBool>,
}

type BackendPair = (Box<dyn CaptureBackend + Send>, Box<dyn PageBackend + Send>);

impl Exporter {
    /// Spawns the worker with the default backends: the fontdue raster and
    /// the printpdf page writer. Font discovery happens on the worker and
    /// failures are reported here, not on the first export.
    pub async fn new(config: ExportConfig) -> Result<Self> {
        Self::spawn(config, None).await
    }

    /// Spawns the worker with caller-supplied backends.
    pub async fn with_backends(
        config: ExportConfig,
        capture: Box<dyn CaptureBackend + Send>,
        page: Box<dyn PageBackend + Send>,
    ) -> Result<Self> {
        Self::spawn(config, Some((capture, page))).await
    }

    async fn spawn(config: ExportConfig, backends: Option<BackendPair>) -> Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();
        let (init_tx, init_rx): (oneshot::Sender<Result<()>>, oneshot::Receiver<Result<()>>) =
            oneshot::channel();
        let busy = Arc::new(AtomicBool::new(false));
        let worker_busy = Arc::clone(&busy);

        thread::spawn(move || {
            let (capture, page) = match backends {
                Some(pair) => pair,
                None => match SlipRaster::new(config.font_path.as_deref()) {
                    Ok(raster) => (
                        Box::new(raster) as Box<dyn CaptureBackend + Send>,
                        Box::new(PdfPageWriter::new()) as Box<dyn PageBackend + Send>,
                    ),
                    Err(err) => {
                        let _ = init_tx.send(Err(err));
                        return;
                    }
                },
            };

            let _ = init_tx.send(Ok(()));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    Command::Export(document, resp) => {
                        let res = run_export(&document, capture.as_ref(), page.as_ref(), &config);
                        // Release the guard before replying so the caller can
                        // start its next export as soon as it resumes.
                        worker_busy.store(false, Ordering::SeqCst);
                        let _ = resp.send(res);
                    }
                    Command::Close(resp) => {
                        let _ = resp.send(Ok(()));
                        break;
                    }
                }
            }
        });

        init_rx
            .await
            .map_err(|e| Error::Other(format!("Worker init canceled: {e}")))??;

        Ok(Self { cmd_tx, busy })
    }

    /// Whether an export is currently running.
    pub fn is_exporting(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Captures the document, wraps it in a PDF page and saves it under the
    /// room's file name in the configured output directory. Returns the
    /// saved path. Nothing is written when any stage fails.
    pub async fn export(&self, document: &ReceiptDocument) -> Result<PathBuf> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(Error::ExportBusy);
        }

        let (tx, rx) = oneshot::channel();
        if self
            .cmd_tx
            .send(Command::Export(document.clone(), tx))
            .is_err()
        {
            self.busy.store(false, Ordering::SeqCst);
            return Err(Error::Other("Export worker is gone".into()));
        }

        match rx.await {
            Ok(res) => res,
            Err(e) => {
                self.busy.store(false, Ordering::SeqCst);
                Err(Error::Other(format!("Export canceled: {e}")))
            }
        }
    }

    /// Shuts the worker down.
    pub async fn close(self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        let _ = self.cmd_tx.send(Command::Close(tx));
        rx.await
            .map_err(|e| Error::Other(format!("Close canceled: {e}")))?
    }
}

fn run_export(
    document: &ReceiptDocument,
    capture: &dyn CaptureBackend,
    page: &dyn PageBackend,
    config: &ExportConfig,
) -> Result<PathBuf> {
    log::info!("exporting slip for room {}", document.room_number);
    let shot = capture.capture(document, &config.capture)?;
    let bytes = page.write_page(&shot, &config.page)?;
    save_document(
        &config.out_dir,
        &slip_file_name(&document.room_number),
        &bytes,
    )
}

/// Writes next to the target and renames into place, so a failed export
/// never leaves a half-written slip under the real name.
fn save_document(dir: &Path, name: &str, bytes: &[u8]) -> Result<PathBuf> {
    let path = dir.join(name);
    let staging = dir.join(format!("{name}.part"));
    if let Err(e) = std::fs::write(&staging, bytes) {
        // A write can fail after creating the file; drop the partial one.
        let _ = std::fs::remove_file(&staging);
        return Err(Error::SaveError(format!("{}: {e}", staging.display())));
    }
    if let Err(e) = std::fs::rename(&staging, &path) {
        let _ = std::fs::remove_file(&staging);
        return Err(Error::SaveError(format!("{}: {e}", path.display())));
    }
    log::debug!("wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_keeps_the_thai_prefix() {
        assert_eq!(slip_file_name("101"), "ใบเสร็จห้อง101.pdf");
        assert_eq!(slip_file_name("A-2"), "ใบเสร็จห้องA-2.pdf");
    }

    #[test]
    fn save_replaces_an_existing_slip() {
        let dir = tempfile::tempdir().unwrap();
        let name = "ใบเสร็จห้อง9.pdf";
        save_document(dir.path(), name, b"old").unwrap();
        let path = save_document(dir.path(), name, b"new").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"new");
        // No staging leftovers.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    #[cfg(unix)]
    fn a_failed_write_cleans_up_its_staging_file() {
        if !Path::new("/dev/full").exists() {
            eprintln!("skipping a_failed_write_cleans_up_its_staging_file: no /dev/full");
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let name = "ใบเสร็จห้อง9.pdf";
        let staging = dir.path().join(format!("{name}.part"));
        // Backing the staging path with /dev/full fails the write itself,
        // after the file is already open.
        std::os::unix::fs::symlink("/dev/full", &staging).unwrap();

        let err = save_document(dir.path(), name, b"bytes").unwrap_err();
        assert!(matches!(err, Error::SaveError(_)));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
