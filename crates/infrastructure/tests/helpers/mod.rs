#![allow(dead_code)]
pub mod doh_server_mock;
pub mod upstream_mock;

pub use doh_server_mock::MockDohServer;
pub use upstream_mock::MockUpstream;

use hickory_proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::rdata::{A, TXT};
use hickory_proto::rr::{Name, RData, Record, RecordType};
use std::str::FromStr;

pub const REQUEST: &[u8] = b"abc";

/// Response for `example.com. A` with a single 1.1.1.1 answer.
pub fn expected_message() -> Message {
    response_with_code(ResponseCode::NoError)
}

pub fn response_with_code(code: ResponseCode) -> Message {
    let name = Name::from_str("example.com.").unwrap();
    let mut message = Message::new();
    message
        .set_id(0)
        .set_message_type(MessageType::Response)
        .set_op_code(OpCode::Query)
        .set_response_code(code)
        .add_query(Query::query(name.clone(), RecordType::A))
        .add_answer(Record::from_rdata(name, 30, RData::A(A::new(1, 1, 1, 1))));
    message
}

pub fn pack(message: &Message) -> Vec<u8> {
    message.to_vec().unwrap()
}

/// Valid response whose wire form is exactly `size` bytes, padded with a TXT
/// answer.
pub fn message_of_size(size: usize) -> Vec<u8> {
    let base = with_txt(Vec::new());
    let mut missing = size
        .checked_sub(pack(&base).len())
        .expect("size below the unpadded message");

    // Each character-string costs one length byte plus its content.
    let mut strings = Vec::new();
    while missing > 256 {
        strings.push("a".repeat(255));
        missing -= 256;
    }
    if missing > 0 {
        strings.push("a".repeat(missing - 1));
    }

    let wire = pack(&with_txt(strings));
    assert_eq!(wire.len(), size);
    wire
}

fn with_txt(strings: Vec<String>) -> Message {
    let mut message = expected_message();
    let name = Name::from_str("example.com.").unwrap();
    message.add_answer(Record::from_rdata(name, 30, RData::TXT(TXT::new(strings))));
    message
}
