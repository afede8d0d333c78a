use twilight_model::gateway::payload::incoming::MessageCreate;

use crate::{BASIC, CommandMeta, checks::Access};
use petal_core::Context;

pub const META: CommandMeta = CommandMeta {
    name: "ping",
    desc: "Checks the bot's latency.",
    category: BASIC.name,
    usage: "ping",
    aliases: &[],
    access: Access::Everyone,
};

/// Reply, then edit the reply to show the round trip in milliseconds.
pub async fn run(ctx: &Context, msg: &MessageCreate) -> anyhow::Result<()> {
    let http = &ctx.http;
    let reply = http
        .create_message(msg.channel_id)
        .content("Pong!")
        .await?
        .model()
        .await?;

    let latency = latency_ms(msg.timestamp.as_micros(), reply.timestamp.as_micros());
    http.update_message(reply.channel_id, reply.id)
        .content(Some(&format!("Pong! **{latency} ms**")))
        .await?;

    Ok(())
}

fn latency_ms(sent_micros: i64, replied_micros: i64) -> i64 {
    (replied_micros - sent_micros).max(0) / 1000
}
