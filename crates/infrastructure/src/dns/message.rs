//! DNS message helpers
//!
//! Query construction for the command line tools and the small amount of
//! response inspection the proxy needs: response-code naming for metrics and
//! the reply/request consistency check of the UDP front.

use hickory_proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::{Name, RecordType};
use hickory_proto::ProtoError;
use std::borrow::Cow;
use std::str::FromStr;

/// Build a recursive query for `domain` and serialize it to wire format.
///
/// The message id is random; it is returned alongside the bytes so callers can
/// match the reply.
pub fn build_query(domain: &str, record_type: RecordType) -> Result<(u16, Vec<u8>), ProtoError> {
    let name = Name::from_str(domain)?;
    let id = fastrand::u16(..);

    let mut message = Message::new();
    message
        .set_id(id)
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(true)
        .add_query(Query::query(name, record_type));

    Ok((id, message.to_vec()?))
}

/// Mnemonic of a response code, or its decimal value when unassigned.
pub fn rcode_name(code: ResponseCode) -> Cow<'static, str> {
    let value = u16::from(code);
    let name = match value {
        0 => "NOERROR",
        1 => "FORMERR",
        2 => "SERVFAIL",
        3 => "NXDOMAIN",
        4 => "NOTIMP",
        5 => "REFUSED",
        6 => "YXDOMAIN",
        7 => "YXRRSET",
        8 => "NXRRSET",
        9 => "NOTAUTH",
        10 => "NOTZONE",
        16 => "BADSIG",
        17 => "BADKEY",
        18 => "BADTIME",
        19 => "BADMODE",
        20 => "BADNAME",
        21 => "BADALG",
        22 => "BADTRUNC",
        23 => "BADCOOKIE",
        _ => return Cow::Owned(value.to_string()),
    };
    Cow::Borrowed(name)
}

/// Whether `reply` answers `request`: same id and same question section.
pub fn reply_matches(request: &Message, reply: &Message) -> bool {
    reply.id() == request.id() && reply.queries() == request.queries()
}

/// Empty reply to `request` carrying only `code`.
pub fn error_reply(request: &Message, code: ResponseCode) -> Message {
    let mut reply = Message::new();
    reply
        .set_id(request.id())
        .set_message_type(MessageType::Response)
        .set_op_code(request.op_code())
        .set_recursion_desired(request.recursion_desired())
        .set_recursion_available(true)
        .set_response_code(code)
        .add_queries(request.queries().to_vec());
    reply
}
