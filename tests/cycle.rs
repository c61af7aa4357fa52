use std::cell::RefCell;
use std::io::{Read, Seek, SeekFrom};

use todo_printer::api::{Error as ApiError, MessageApi};
use todo_printer::daemon;
use todo_printer::printer::Printer;

/// Scripted remote API: counts calls and fails on demand.
#[derive(Default)]
struct StubApi {
    pending: Vec<String>,
    fail_login: bool,
    fail_fetch: bool,
    logins: RefCell<u32>,
    fetches: RefCell<u32>,
    deletes: RefCell<u32>,
}

impl StubApi {
    fn with_messages(messages: &[&str]) -> Self {
        StubApi {
            pending: messages.iter().map(|m| m.to_string()).collect(),
            ..StubApi::default()
        }
    }
}

impl MessageApi for StubApi {
    fn login(&self) -> Result<String, ApiError> {
        *self.logins.borrow_mut() += 1;
        if self.fail_login {
            return Err(ApiError::InvalidResponse("login refused".into()));
        }
        Ok("stub-token".to_string())
    }

    fn messages(&self, token: &str) -> Result<Vec<String>, ApiError> {
        assert_eq!(token, "stub-token");
        *self.fetches.borrow_mut() += 1;
        if self.fail_fetch {
            return Err(ApiError::InvalidResponse("fetch refused".into()));
        }
        Ok(self.pending.clone())
    }

    fn delete_messages(&self, token: &str) -> Result<(), ApiError> {
        assert_eq!(token, "stub-token");
        *self.deletes.borrow_mut() += 1;
        Ok(())
    }
}

const INIT: &[u8] = &[0x1b, 0x40];
const FEED: &[u8] = &[0x1b, 0x64, 0x02];
const CUT: &[u8] = &[0x1d, 0x56, 0x41, 0x30];
const POWER_DOWN: &[u8] = &[0xfa];

#[test]
fn cycle_prints_each_message_as_its_own_receipt() {
    let api = StubApi::with_messages(&["a", "b"]);
    let mut printer = Printer::new(Vec::new());

    daemon::cycle(&api, &mut printer).unwrap();

    let mut expected = Vec::new();
    expected.extend_from_slice(INIT);
    expected.extend_from_slice(b"a");
    expected.extend_from_slice(FEED);
    expected.extend_from_slice(CUT);
    expected.extend_from_slice(b"b");
    expected.extend_from_slice(FEED);
    expected.extend_from_slice(CUT);
    expected.extend_from_slice(POWER_DOWN);
    assert_eq!(printer.into_inner(), expected);

    assert_eq!(*api.logins.borrow(), 1);
    assert_eq!(*api.fetches.borrow(), 1);
    assert_eq!(*api.deletes.borrow(), 1);
}

#[test]
fn fetch_failure_degrades_to_an_empty_batch() {
    let mut api = StubApi::with_messages(&["never printed"]);
    api.fail_fetch = true;
    let mut printer = Printer::new(Vec::new());

    daemon::cycle(&api, &mut printer).unwrap();

    assert!(printer.into_inner().is_empty());
    // The cycle still acknowledges and would proceed to sleep.
    assert_eq!(*api.deletes.borrow(), 1);
}

#[test]
fn auth_failure_is_fatal_before_anything_else_runs() {
    let mut api = StubApi::with_messages(&["a"]);
    api.fail_login = true;
    let mut printer = Printer::new(Vec::new());

    let err = daemon::cycle(&api, &mut printer).unwrap_err();

    assert!(matches!(err, daemon::Error::Auth(_)));
    assert_eq!(*api.fetches.borrow(), 0);
    assert_eq!(*api.deletes.borrow(), 0);
    assert!(printer.into_inner().is_empty());
}

#[test]
fn empty_batch_writes_nothing_but_still_acknowledges() {
    let api = StubApi::with_messages(&[]);
    let mut printer = Printer::new(Vec::new());

    daemon::cycle(&api, &mut printer).unwrap();

    assert!(printer.into_inner().is_empty());
    assert_eq!(*api.deletes.borrow(), 1);
}

#[test]
fn file_device_receives_the_same_bytes() {
    let api = StubApi::with_messages(&["receipt"]);
    let mut printer = Printer::new(tempfile::tempfile().unwrap());

    daemon::cycle(&api, &mut printer).unwrap();

    let mut file = printer.into_inner();
    file.seek(SeekFrom::Start(0)).unwrap();
    let mut contents = Vec::new();
    file.read_to_end(&mut contents).unwrap();

    let mut expected = Vec::new();
    expected.extend_from_slice(INIT);
    expected.extend_from_slice(b"receipt");
    expected.extend_from_slice(FEED);
    expected.extend_from_slice(CUT);
    expected.extend_from_slice(POWER_DOWN);
    assert_eq!(contents, expected);
}
