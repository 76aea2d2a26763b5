use hprovider::hunyuan::{SigningTarget, Tc3Signer, sha256_hex};
use hprovider::{Credentials, ProviderErrorKind};

fn signer(host: &str) -> Tc3Signer {
    Tc3Signer::new(
        Credentials::new("AKIDbehavior", "behavior-secret").expect("credentials"),
        SigningTarget::default().with_host(host),
    )
}

#[test]
fn every_single_byte_change_in_body_changes_signature() {
    let signer = signer("hunyuan.tencentcloudapi.com");
    let body = br#"{"Model":"hunyuan-pro","Messages":[{"Role":"user","Content":"hi"}]}"#.to_vec();
    let baseline = signer.sign_at(&body, 1_700_000_000).expect("baseline");

    for position in 0..body.len() {
        let mut changed = body.clone();
        changed[position] ^= 0x01;
        let signed = signer.sign_at(&changed, 1_700_000_000).expect("changed");
        assert_ne!(signed.signature(), baseline.signature(), "byte {position}");
    }
}

#[test]
fn host_is_part_of_the_signed_headers() {
    let body = b"{}";
    let public = signer("hunyuan.tencentcloudapi.com")
        .sign_at(body, 1_700_000_000)
        .expect("public");
    let intl = signer("hunyuan.intl.tencentcloudapi.com")
        .sign_at(body, 1_700_000_000)
        .expect("intl");

    assert_ne!(public.signature(), intl.signature());
    assert!(
        intl.context()
            .canonical_request
            .contains("host:hunyuan.intl.tencentcloudapi.com\n")
    );
}

#[test]
fn date_scope_rolls_over_at_utc_midnight() {
    let signer = signer("hunyuan.tencentcloudapi.com");
    let before = signer.signing_context(b"{}", 1_551_139_199).expect("before");
    let after = signer.signing_context(b"{}", 1_551_139_200).expect("after");

    assert_eq!(before.date, "2019-02-25");
    assert_eq!(after.date, "2019-02-26");
    assert_ne!(before.signing_key_hex(), after.signing_key_hex());
}

#[test]
fn canonical_request_ends_with_body_digest() {
    let body = br#"{"Model":"hunyuan-lite"}"#;
    let context = signer("hunyuan.tencentcloudapi.com")
        .signing_context(body, 1_700_000_000)
        .expect("context");

    assert!(context.canonical_request.ends_with(&sha256_hex(body)));
}

#[test]
fn blank_credentials_never_reach_the_signer() {
    let error = Credentials::new("", "secret").expect_err("blank id");
    assert_eq!(error.kind, ProviderErrorKind::Configuration);
}
