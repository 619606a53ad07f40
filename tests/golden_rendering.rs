use std::fs;
use std::path::PathBuf;

use sha2::{Digest, Sha256};

use rentslip::{CaptureBackend, CaptureOptions, ReceiptDocument, ReceiptRecord, SlipRaster};

fn golden_path(name: &str) -> PathBuf {
    let mut p = PathBuf::from("tests/goldens/expected");
    p.push(name);
    p
}

fn fixture_record() -> ReceiptRecord {
    let mut r = ReceiptRecord::new("101");
    r.room_rate = 3000.0;
    r.billing_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
    r.water_unit_start = 100;
    r.water_unit_end = 120;
    r.electric_unit_start = 50;
    r.electric_unit_end = 80;
    r.garbage_fee = 50.0;
    r.late_days = 0;
    r.parking_spaces = 1;
    r
}

fn digest(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

#[test]
fn slip_text_renders_deterministically() {
    let record = fixture_record();
    let first = ReceiptDocument::from_record(&record).to_text();
    let second = ReceiptDocument::from_record(&record).to_text();
    assert_eq!(first, second);
    assert_eq!(digest(first.as_bytes()), digest(second.as_bytes()));
}

#[test]
fn golden_slip_text_matches_fixture() {
    let text = ReceiptDocument::from_record(&fixture_record()).to_text();
    let d = digest(text.as_bytes());

    let expected_path = golden_path("slip101_text.hash");
    if std::env::var("UPDATE_GOLDENS").is_ok() {
        fs::create_dir_all("tests/goldens/expected").ok();
        fs::write(&expected_path, &d).expect("write golden");
        println!("Updated golden: {expected_path:?}");
        return;
    }

    if !expected_path.exists() {
        println!(
            "No golden at {expected_path:?}; run with UPDATE_GOLDENS=1 to create it. Skipping."
        );
        return;
    }

    let expected = fs::read_to_string(&expected_path).expect("unable to read golden");
    assert_eq!(d, expected.trim());
}

#[test]
fn golden_capture_matches_fixture() {
    // Pixel output depends on the installed font; the golden is only
    // meaningful on a machine where one of the search paths resolves.
    let raster = match SlipRaster::new(None) {
        Ok(r) => r,
        Err(err) => {
            eprintln!("skipping capture golden, no font available: {err}");
            return;
        }
    };

    let document = ReceiptDocument::from_record(&fixture_record());
    let shot = raster
        .capture(&document, &CaptureOptions::default())
        .expect("capture");
    let d = digest(&shot.png_data);

    let expected_path = golden_path("slip101_capture.hash");
    if std::env::var("UPDATE_GOLDENS").is_ok() {
        fs::create_dir_all("tests/goldens/expected").ok();
        fs::write(&expected_path, &d).expect("write golden");
        println!("Updated golden: {expected_path:?}");
        return;
    }

    if !expected_path.exists() {
        println!(
            "No golden at {expected_path:?}; run with UPDATE_GOLDENS=1 to create it. Skipping."
        );
        return;
    }

    let expected = fs::read_to_string(&expected_path).expect("unable to read golden");
    assert_eq!(d, expected.trim(), "capture drifted from the recorded golden");
}

#[test]
fn captures_are_byte_stable_within_a_run() {
    let raster = match SlipRaster::new(None) {
        Ok(r) => r,
        Err(err) => {
            eprintln!("skipping capture stability test, no font available: {err}");
            return;
        }
    };
    let document = ReceiptDocument::from_record(&fixture_record());
    let a = raster
        .capture(&document, &CaptureOptions::default())
        .expect("capture");
    let b = raster
        .capture(&document, &CaptureOptions::default())
        .expect("capture");
    assert_eq!(a.png_data, b.png_data);
}
