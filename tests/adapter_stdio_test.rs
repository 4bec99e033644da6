//! Adapter over a scripted byte stream: lines arrive with pauses between them

use std::time::Duration;

use tokio::io::BufReader;

use drop_jelly::adapter::run;
use drop_jelly::core::SimConfig;
use drop_jelly::engine::Session;

fn parse(out: &[u8]) -> Vec<serde_json::Value> {
    std::str::from_utf8(out)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

#[tokio::test(start_paused = true)]
async fn scripted_session_reports_busy_then_idle() {
    let input = tokio_test::io::Builder::new()
        .read(b"{\"type\":\"place\",\"seq\":1,\"column\":1}\n")
        .read(b"{\"type\":\"place\",\"seq\":2,\"column\":1}\n")
        .wait(Duration::from_secs(10))
        .read(b"{\"type\":\"place\",\"seq\":3,\"column\":1}\n")
        .read(b"not json\n")
        .build();

    let mut session = Session::new(SimConfig::with_size(5, 3));
    let mut out = Vec::new();
    let stats = run(&mut session, BufReader::new(input), &mut out)
        .await
        .unwrap();
    assert_eq!(stats.lines, 4);
    assert_eq!(stats.rejected_lines, 1);

    let msgs = parse(&out);
    let acks: Vec<_> = msgs.iter().filter(|m| m["type"] == "ack").collect();
    assert_eq!(acks.len(), 3);
    assert_eq!(acks[0]["accepted"], true);
    assert_eq!(acks[0]["row"], 4);
    // The landing move is still running when the second line arrives.
    assert_eq!(acks[1]["accepted"], false);
    assert_eq!(acks[1]["error"], "cascade_busy");
    assert_eq!(acks[2]["accepted"], true);

    let error = msgs.iter().find(|m| m["type"] == "error").unwrap();
    assert_eq!(error["code"], "malformed");
    assert!(error.get("seq").is_none());

    let last = msgs.last().unwrap();
    assert_eq!(last["type"], "observation");
    assert_eq!(last["cascade_idle"], true);
    let occupied = last["cells"]
        .as_array()
        .unwrap()
        .iter()
        .flat_map(|row| row.as_array().unwrap())
        .filter(|c| !c.is_null())
        .count();
    // Two tiles placed; matches can only remove them.
    assert!(occupied <= 2);
}
