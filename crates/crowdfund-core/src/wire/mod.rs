//! Wire - 呼び出し元向けの表現
//!
//! RPC のエンコーディング自体は外部の関心事です。ここでは正準の
//! request/response 形と、ordinal ⇔ ドメイン enum の codec だけを持ちます。

pub mod codec;
pub mod messages;

pub use self::codec::{
    CodecError, campaign_view, category_from_wire, category_to_wire, encode_event,
    new_campaign_from_request, patch_from_request, status_from_wire, status_to_wire,
};
pub use self::messages::*;
