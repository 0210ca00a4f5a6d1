use dav_multiget::caldav::names::CALENDAR_DATA;
use dav_multiget::carddav::names::ADDRESS_DATA;
use dav_multiget::webdav::names::{DISPLAYNAME, GETETAG};
use dav_multiget::{
    Error, MultigetKind, MultigetRequest, QualifiedName, UsageError, build_multiget_body,
};

use crate::support::{CannedTransport, session};

fn crlf(text: &str) -> String {
    text.replace('\n', "\r\n")
}

fn addressbook_body(hrefs: &[&str], props: &[QualifiedName]) -> String {
    build_multiget_body(MultigetKind::ADDRESSBOOK, hrefs, props)
}

#[test]
fn test_method_is_report() {
    let session = session(CannedTransport::refusing());
    let request =
        MultigetRequest::addressbook(&session, "/", Vec::<&str>::new(), Vec::<QualifiedName>::new())
            .expect("valid request");
    assert_eq!(request.method(), "REPORT");
}

#[test]
fn test_one_href_only() {
    assert_eq!(
        addressbook_body(&["/a"], &[]),
        crlf(
            r#"<?xml version='1.0' encoding='utf-8'?>
<ns0:addressbook-multiget xmlns:ns0="urn:ietf:params:xml:ns:carddav">
  <ns1:href xmlns:ns1="DAV:">/a</ns1:href>
</ns0:addressbook-multiget>
"#
        )
    );
}

#[test]
fn test_multiple_hrefs_only() {
    assert_eq!(
        addressbook_body(&["/a", "/b"], &[]),
        crlf(
            r#"<?xml version='1.0' encoding='utf-8'?>
<ns0:addressbook-multiget xmlns:ns0="urn:ietf:params:xml:ns:carddav">
  <ns1:href xmlns:ns1="DAV:">/a</ns1:href>
  <ns1:href xmlns:ns1="DAV:">/b</ns1:href>
</ns0:addressbook-multiget>
"#
        )
    );
}

#[test]
fn test_multiple_hrefs_one_property() {
    assert_eq!(
        addressbook_body(&["/a", "/b"], &[GETETAG]),
        crlf(
            r#"<?xml version='1.0' encoding='utf-8'?>
<ns0:addressbook-multiget xmlns:ns0="urn:ietf:params:xml:ns:carddav">
  <ns1:prop xmlns:ns1="DAV:">
    <ns1:getetag />
  </ns1:prop>
  <ns1:href xmlns:ns1="DAV:">/a</ns1:href>
  <ns1:href xmlns:ns1="DAV:">/b</ns1:href>
</ns0:addressbook-multiget>
"#
        )
    );
}

#[test]
fn test_multiple_hrefs_multiple_properties() {
    assert_eq!(
        addressbook_body(&["/a", "/b"], &[GETETAG, DISPLAYNAME]),
        crlf(
            r#"<?xml version='1.0' encoding='utf-8'?>
<ns0:addressbook-multiget xmlns:ns0="urn:ietf:params:xml:ns:carddav">
  <ns1:prop xmlns:ns1="DAV:">
    <ns1:getetag />
    <ns1:displayname />
  </ns1:prop>
  <ns1:href xmlns:ns1="DAV:">/a</ns1:href>
  <ns1:href xmlns:ns1="DAV:">/b</ns1:href>
</ns0:addressbook-multiget>
"#
        )
    );
}

#[test]
fn test_no_hrefs_no_properties_is_bare_root() {
    assert_eq!(
        addressbook_body(&[], &[]),
        crlf(
            r#"<?xml version='1.0' encoding='utf-8'?>
<ns0:addressbook-multiget xmlns:ns0="urn:ietf:params:xml:ns:carddav" />
"#
        )
    );
}

// Whether servers accept a multiget without any href is unverified; the body is still built.
#[test]
fn test_properties_without_hrefs_is_allowed() {
    let body = addressbook_body(&[], &[GETETAG]);
    assert_eq!(
        body,
        crlf(
            r#"<?xml version='1.0' encoding='utf-8'?>
<ns0:addressbook-multiget xmlns:ns0="urn:ietf:params:xml:ns:carddav">
  <ns1:prop xmlns:ns1="DAV:">
    <ns1:getetag />
  </ns1:prop>
</ns0:addressbook-multiget>
"#
        )
    );
    assert!(!body.contains("href"));
}

#[test]
fn test_calendar_variant_shares_the_skeleton() {
    assert_eq!(
        build_multiget_body(MultigetKind::CALENDAR, &["/cal/1.ics"], &[GETETAG, CALENDAR_DATA]),
        crlf(
            r#"<?xml version='1.0' encoding='utf-8'?>
<ns0:calendar-multiget xmlns:ns0="urn:ietf:params:xml:ns:caldav">
  <ns1:prop xmlns:ns1="DAV:">
    <ns1:getetag />
    <ns0:calendar-data />
  </ns1:prop>
  <ns1:href xmlns:ns1="DAV:">/cal/1.ics</ns1:href>
</ns0:calendar-multiget>
"#
        )
    );
}

#[test]
fn test_property_in_root_namespace_reuses_root_prefix() {
    let body = addressbook_body(&["/a"], &[GETETAG, ADDRESS_DATA]);
    assert!(body.contains("    <ns0:address-data />\r\n"));
}

#[test]
fn test_foreign_namespace_is_declared_on_the_property() {
    let color = QualifiedName::new("http://apple.com/ns/ical/", "calendar-color").unwrap();
    let body = build_multiget_body(MultigetKind::CALENDAR, &["/a"], &[color, GETETAG]);
    assert!(body.contains(
        "    <ns2:calendar-color xmlns:ns2=\"http://apple.com/ns/ical/\" />\r\n    <ns1:getetag />\r\n"
    ));
}

#[test]
fn test_duplicate_properties_are_kept_in_order() {
    let body = addressbook_body(&["/a"], &[DISPLAYNAME, GETETAG, DISPLAYNAME]);
    let display = body.match_indices("<ns1:displayname />").count();
    assert_eq!(display, 2);
    let first = body.find("displayname").unwrap();
    let etag = body.find("getetag").unwrap();
    let last = body.rfind("displayname").unwrap();
    assert!(first < etag && etag < last);
}

#[test]
fn test_hrefs_are_verbatim_except_xml_escaping() {
    let body = addressbook_body(&["/a%20b/c d.vcf", "/x?y=1&z=2"], &[]);
    assert!(body.contains(">/a%20b/c d.vcf</ns1:href>"));
    assert!(body.contains(">/x?y=1&amp;z=2</ns1:href>"));
}

#[test]
fn test_prop_precedes_every_href() {
    let hrefs = ["/1", "/2", "/3", "/4"];
    let body = addressbook_body(&hrefs, &[GETETAG, DISPLAYNAME]);
    assert_eq!(body.matches("<ns1:prop ").count(), 1);
    let prop_end = body.find("</ns1:prop>").unwrap();
    let mut last = prop_end;
    for href in hrefs {
        let at = body.find(&format!(">{href}</ns1:href>")).unwrap();
        assert!(at > last, "{href} out of order");
        last = at;
    }
    assert_eq!(body.matches("<ns1:href ").count(), hrefs.len());
}

#[test]
fn test_serialization_is_deterministic() {
    let session = session(CannedTransport::refusing());
    let request = MultigetRequest::addressbook(
        &session,
        "/addressbooks/user01/addressbook/",
        ["/a", "/b", "/c"],
        [GETETAG, DISPLAYNAME, ADDRESS_DATA],
    )
    .unwrap();

    let first = request.body();
    let second = request.body();
    assert_eq!(first, second);

    let mut sink = Vec::new();
    request.generate_xml(&mut sink).unwrap();
    assert_eq!(sink, first.as_bytes());
}

#[test]
fn test_property_without_namespace_is_a_usage_violation() {
    assert!(QualifiedName::new("", "getetag").is_err());
    assert!(QualifiedName::new("DAV:", "").is_err());

    let session = session(CannedTransport::refusing());
    let bad = QualifiedName::from_static("", "getetag");
    let err = MultigetRequest::addressbook(&session, "/", ["/a"], [bad])
        .err()
        .expect("rejected");
    assert!(err.is_usage());
    assert_eq!(session.transport().exchanges(), 0);
}

#[test]
fn test_local_name_must_be_an_ncname() {
    for bad in ["get etag><x", "get etag", "ns:getetag", "1st", "-dash", "a<b", "a&b", "a\"b"] {
        assert!(
            matches!(
                QualifiedName::new("DAV:", bad),
                Err(UsageError::InvalidProperty(_))
            ),
            "{bad:?} accepted"
        );
    }
    for good in ["getetag", "principal-URL", "_x", "schedule.tag2", "données"] {
        assert!(QualifiedName::new("DAV:", good).is_ok(), "{good:?} rejected");
    }
}

#[test]
fn test_request_rejects_property_that_would_break_the_body() {
    let session = session(CannedTransport::refusing());
    let err = MultigetRequest::addressbook(
        &session,
        "/",
        ["/a"],
        [GETETAG, QualifiedName::from_static("DAV:", "get etag><x")],
    )
    .err()
    .expect("rejected");
    assert!(matches!(err, Error::Usage(UsageError::InvalidProperty(_))));
    assert_eq!(session.transport().exchanges(), 0);
}
