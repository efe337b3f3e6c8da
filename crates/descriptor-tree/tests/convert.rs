use descriptor_tree::cli::{convert, Args, CliError, ConvertOptions, Format};
use descriptor_tree::{Descriptor, DescriptorError};

const DOC: &str = r#"{"id":7,"tags":["a","b"],"nested":{"ok":true,"none":null}}"#;

fn run(input: &[u8], from: Format, to: Format) -> Vec<u8> {
    convert(input, from, to, &ConvertOptions::default()).unwrap()
}

#[test]
fn json_through_every_format_and_back() {
    for via in [Format::Json, Format::Xml, Format::Bin] {
        let encoded = run(DOC.as_bytes(), Format::Json, via);
        let back = run(&encoded, via, Format::Json);
        assert_eq!(String::from_utf8(back).unwrap(), DOC, "via {via:?}");
    }
}

#[test]
fn binary_output_matches_library_encoding() {
    let bytes = run(DOC.as_bytes(), Format::Json, Format::Bin);
    let expected = Descriptor::from_json_str(DOC).unwrap().encode();
    assert_eq!(bytes, expected);
}

#[test]
fn pretty_json_and_custom_root() {
    let args = Args::parse(["--to", "xml", "--root", "doc", "--item", "item"]).unwrap();
    let out = convert(br#"[1]"#, args.from, args.to, &args.options).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        r#"<doc type="array" count="1"><item data-type="int">1</item></doc>"#
    );

    let options = ConvertOptions {
        pretty: true,
        ..ConvertOptions::default()
    };
    let out = convert(br#"{"a":[1]}"#, Format::Json, Format::Json, &options).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "{\n  \"a\": [\n    1\n  ]\n}"
    );
}

#[test]
fn trailing_newline_in_json_input_is_accepted() {
    let out = run(b"{\"a\":1}\n", Format::Json, Format::Json);
    assert_eq!(out, b"{\"a\":1}");
}

#[test]
fn errors_surface_as_cli_errors() {
    let opts = ConvertOptions::default();
    assert!(matches!(
        convert(b"{", Format::Json, Format::Xml, &opts),
        Err(CliError::Descriptor(DescriptorError::Json(_)))
    ));
    assert!(matches!(
        convert(b"<a>", Format::Xml, Format::Json, &opts),
        Err(CliError::Descriptor(DescriptorError::Xml(_)))
    ));
    assert!(matches!(
        convert(&[0, 0], Format::Bin, Format::Json, &opts),
        Err(CliError::Descriptor(DescriptorError::Buffer(_)))
    ));
}
