//! Tests for table and block listings

mod common;

use common::FakeDebugger;
use heapmeta_core::display::Verbosity;
use heapmeta_core::query::{FieldSelection, FieldSpec};
use heapmeta_core::{Address, Session};

fn render(session: &Session, address: Option<Address>, selection: Option<&FieldSelection>, tier: u8) -> String
{
    let mut out = Vec::new();
    session
        .formatter()
        .with_color(false)
        .render(&mut out, address, selection, Verbosity(tier))
        .unwrap();
    String::from_utf8(out).unwrap()
}

fn annotated_session() -> Session
{
    let mut session = Session::new();
    let mut debugger = FakeDebugger::with_frames(&["f1", "f2"]);
    session.add(&mut debugger, Address::from(0x10), "tag", Some("victim")).unwrap();
    session.add(&mut debugger, Address::from(0x10), "backtrace", None).unwrap();
    session.add(&mut debugger, Address::from(0x20), "color", Some("red")).unwrap();
    session.add(&mut debugger, Address::from(0x20), "owner", Some("t2")).unwrap();
    session
}

#[test]
fn test_empty_session()
{
    let output = render(&Session::new(), None, None, 0);
    assert_eq!(
        output,
        "Metadata database\nN/A\n\nFunction ignore list for backtraces\nN/A\n"
    );
}

#[test]
fn test_tier_zero_drops_discovered_backtrace()
{
    let output = render(&annotated_session(), None, None, 0);
    let expected = "\
Metadata database
| address | tag | color | owner |
| 0x10 | victim | N/A |
| 0x20 | N/A | t2 |

Function ignore list for backtraces
N/A
";
    assert_eq!(output, expected);
}

#[test]
fn test_tier_one_keeps_discovered_backtrace()
{
    let output = render(&annotated_session(), None, None, 1);
    assert!(output.contains("| address | tag | backtrace | color | owner |\n"));
    assert!(output.contains("| 0x10 | victim | f1 | N/A |\n"));
    assert!(output.contains("| 0x20 | N/A | N/A | t2 |\n"));
}

#[test]
fn test_explicit_fields_honor_backtrace_at_tier_zero()
{
    let selection = FieldSelection::Fields(vec![FieldSpec::with_param("backtrace", 2)]);
    let output = render(&annotated_session(), Some(Address::from(0x10)), Some(&selection), 0);

    assert!(output.contains("| address | backtrace:2 |\n"));
    assert!(output.contains("| 0x10 | f1,f2 |\n"));
    assert!(!output.contains("0x20"));
}

#[test]
fn test_block_form_prints_epilog()
{
    let output = render(&annotated_session(), Some(Address::from(0x10)), None, 2);
    let expected = "\
Metadata database
0x10:
victim
#0  f1 ()
#1  f2 ()
'owner' key not found in metadata database


Function ignore list for backtraces
N/A
";
    assert_eq!(output, expected);
}

#[test]
fn test_ignore_list_is_listed_sorted()
{
    let mut session = annotated_session();
    session.configure("ignore", "backtrace", &["malloc", "free"]).unwrap();

    let output = render(&session, None, None, 0);
    assert!(output.ends_with("Function ignore list for backtraces\nfree\nmalloc\n"));
}

#[test]
fn test_unknown_address_lists_no_rows()
{
    let output = render(&annotated_session(), Some(Address::from(0x99)), None, 0);
    assert!(output.contains("| address | tag | color | owner |\n\n"));
}

#[test]
fn test_all_selection_resolves_full_backtrace()
{
    let output = render(&annotated_session(), None, Some(&FieldSelection::All), 0);
    assert!(output.contains("| address | tag | backtrace:-1 | color | owner |\n"));
    assert!(output.contains("| 0x10 | victim | f1,f2 | N/A |\n"));
}

#[test]
fn test_structured_entries()
{
    let session = annotated_session();
    let entries = session.formatter().structured(None, &FieldSelection::All);

    let json = serde_json::to_string(&entries).unwrap();
    assert_eq!(
        json,
        r#"[{"address":"0x10","metadata":["victim",["f1","f2"]]},{"address":"0x20","metadata":["t2"]}]"#
    );
}
