use rstest::rstest;
use sgen_core::Record;
use sgen_renderer::{JsonRenderer, Renderer, TemplateRenderer, JSON_RENDERER_ID};

fn people() -> Vec<Record> {
    ["bob", "alice"]
        .iter()
        .map(|name| {
            let mut r = Record::new();
            r.insert("name".to_string(), name.to_string());
            r
        })
        .collect()
}

fn render_all(renderer: &dyn Renderer, records: &[Record]) -> Vec<String> {
    records
        .iter()
        .map(|r| renderer.render(r).expect("render"))
        .collect()
}

#[rstest]
#[case("{{ name }}", &["bob", "alice"])]
#[case("- {{ name }}", &["- bob", "- alice"])]
#[case("{{ name | upper }}", &["BOB", "ALICE"])]
#[case("{{ name | repeat(count=2) }}", &["bobbob", "alicealice"])]
#[case("{% if name == 'bob' %}B{% else %}{{ name }}{% endif %}", &["B", "alice"])]
fn templates_render_each_record(#[case] text: &str, #[case] expected: &[&str]) {
    let renderer = TemplateRenderer::new(text).expect("compile");
    assert_eq!(render_all(&renderer, &people()), expected);
}

#[test]
fn json_renderer_is_the_structural_default() {
    assert_eq!(JsonRenderer.id(), JSON_RENDERER_ID);
    assert_eq!(
        render_all(&JsonRenderer, &people()),
        [r#"{"name":"bob"}"#, r#"{"name":"alice"}"#]
    );
}

#[test]
fn rendering_is_deterministic_across_instances() {
    let text = "{{ name }}!";
    let a = TemplateRenderer::new(text).unwrap();
    let b = TemplateRenderer::new(text).unwrap();
    assert_eq!(a.id(), b.id());
    assert_eq!(render_all(&a, &people()), render_all(&b, &people()));
    assert_eq!(render_all(&a, &people()), render_all(&a, &people()));
}

#[test]
fn renderers_are_usable_as_trait_objects() {
    let renderers: Vec<Box<dyn Renderer>> = vec![
        Box::new(JsonRenderer),
        Box::new(TemplateRenderer::new("{{ name }}").unwrap()),
    ];
    let ids: Vec<_> = renderers.iter().map(|r| r.id().to_string()).collect();
    assert_eq!(ids, ["<JSON>", "{{ name }}"]);
}
