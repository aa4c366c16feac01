//! End-to-end scenarios S1-S6 from the verifier specification, driven
//! entirely through `Database::ingest`.

use metamath_verifier::{Database, Kind};
use std::io::Cursor;

fn ingest(db: &mut Database, name: &str, text: &str) -> metamath_verifier::Result<()> {
    db.ingest(name, Cursor::new(text.as_bytes().to_vec()), true)
}

const S1_DB: &str = "
$c ( ) -> wff $.
$v p q $.
wp $f wff p $.
wq $f wff q $.
w2 $a wff ( p -> q ) $.
wnew $p wff ( p -> q ) $= wp wq w2 $.
";

#[test]
fn s1_minimal_proof() {
    let mut db = Database::new();
    ingest(&mut db, "s1.mm", S1_DB).expect("S1 should verify");
    assert_eq!(db.verified_count(), 1);
    let entry = db.label_info("wnew").expect("wnew recorded");
    let af = entry.assertion().expect("wnew is a theorem");
    assert_eq!(af.conclusion.to_string(), "wff ( p -> q )");
}

#[test]
fn s2_stack_underflow() {
    let db_text = "
$c ( ) -> wff $.
$v p q $.
wp $f wff p $.
wq $f wff q $.
w2 $a wff ( p -> q ) $.
wnew $p wff ( p -> q ) $= w2 $.
";
    let mut db = Database::new();
    let err = ingest(&mut db, "s2.mm", db_text).unwrap_err();
    assert_eq!(err.kind, Kind::StackUnderflow);
}

#[test]
fn s3_disjoint_violation_names_the_shared_variable() {
    let db_text = "
$c wff set ( ) = $.
$v x y z $.
vx $f set x $.
vy $f set y $.
vz $f set z $.
$d x y $.
ax $a wff ( x = y ) $.
bad $p wff ( z = z ) $= vz vz ax $.
";
    let mut db = Database::new();
    let err = ingest(&mut db, "s3.mm", db_text).unwrap_err();
    assert_eq!(err.kind, Kind::DisjointViolation);
    assert!(err.message.contains('z'));
}

#[test]
fn s4_compressed_proof_verifies_s1() {
    let db_text = "
$c ( ) -> wff $.
$v p q $.
wp $f wff p $.
wq $f wff q $.
w2 $a wff ( p -> q ) $.
wnew $p wff ( p -> q ) $= ( w2 ) ABC $.
";
    let mut db = Database::new();
    ingest(&mut db, "s4.mm", db_text).expect("compressed S1 should verify");
    assert_eq!(db.verified_count(), 1);
}

#[test]
fn s5_back_reference_reproduces_earlier_fragment() {
    // `wallofit` cites the same `w2` subproof (three steps: wp, wq, w2)
    // twice, the second time purely via a `Z` back-reference, to build both
    // mandatory inputs of `wboth`. If the decoder forgot the subproof and
    // only remembered `w2`'s own label, the second `wp`/`wq` steps would be
    // missing and the checker would see a stack underflow instead.
    let db_text = "
$c ( ) -> wff $.
$v p q r s $.
wp $f wff p $.
wq $f wff q $.
vr $f wff r $.
vs $f wff s $.
w2 $a wff ( p -> q ) $.
wboth $a wff ( r -> s ) $.
wallofit $p wff ( ( p -> q ) -> ( p -> q ) ) $= ( w2 wboth ) ABCZED $.
";
    let mut db = Database::new();
    ingest(&mut db, "s5.mm", db_text).expect("back-reference proof should verify");
    assert_eq!(db.verified_count(), 1);
}

#[test]
fn s6_include_once_suppresses_second_inclusion() {
    let dir = tempfile::tempdir().unwrap();
    let included_path = dir.path().join("consts.mm");
    std::fs::write(&included_path, "$c wff $.\n").unwrap();

    let main_path = dir.path().join("main.mm");
    std::fs::write(
        &main_path,
        "$[ consts.mm $]\n$[ consts.mm $]\n$v p $.\nwp $f wff p $.\n",
    )
    .unwrap();

    let mut db = Database::new();
    let file = std::fs::File::open(&main_path).unwrap();
    db.ingest(main_path.to_string_lossy().into_owned(), file, true)
        .expect("second inclusion of consts.mm should be a silent no-op");
    assert!(db.label_info("wp").is_some());
}

#[test]
fn empty_proof_is_stack_mismatch() {
    let db_text = "
$c wff $.
wtru $a wff tru $.
wbad $p wff tru $= $.
";
    let mut db = Database::new();
    let err = ingest(&mut db, "empty.mm", db_text).unwrap_err();
    assert_eq!(err.kind, Kind::StackMismatch);
}

#[test]
fn undeclared_label_reference_fails() {
    let db_text = "
$c wff $.
wbad $p wff tru $= nope $.
";
    let mut db = Database::new();
    let err = ingest(&mut db, "undecl.mm", db_text).unwrap_err();
    assert_eq!(err.kind, Kind::UnknownLabel);
}

#[test]
fn p_statement_without_proof_marker_is_malformed() {
    let db_text = "
$c wff $.
wbad $p wff tru $.
";
    let mut db = Database::new();
    let err = ingest(&mut db, "noeq.mm", db_text).unwrap_err();
    assert_eq!(err.kind, Kind::MalformedProof);
}

#[test]
fn duplicate_label_is_rejected() {
    let db_text = "
$c wff $.
wtru $a wff tru $.
wtru $a wff tru $.
";
    let mut db = Database::new();
    let err = ingest(&mut db, "dup.mm", db_text).unwrap_err();
    assert_eq!(err.kind, Kind::DuplicateLabel);
}

#[test]
fn nested_scopes_pop_their_declarations() {
    let db_text = "
$c wff $.
${
  $v p $.
$}
${
  wp $f wff p $.
$}
";
    let mut db = Database::new();
    // `p` only lived inside the first `${ $}` block; the second, sibling
    // block can no longer see it as an active variable.
    let err = ingest(&mut db, "scope.mm", db_text).unwrap_err();
    assert_eq!(err.kind, Kind::UnknownVar);
}

#[test]
fn unverified_ingest_still_records_assertions() {
    let db_text = "
$c ( ) -> wff $.
$v p q $.
wp $f wff p $.
wq $f wff q $.
w2 $a wff ( p -> q ) $.
wnew $p wff ( p -> q ) $= w2 $.
";
    let mut db = Database::new();
    db.ingest("noverify.mm", Cursor::new(db_text.as_bytes().to_vec()), false)
        .expect("unverified ingest accepts a broken proof");
    assert_eq!(db.verified_count(), 0);
    assert!(db.label_info("wnew").is_some());
}
