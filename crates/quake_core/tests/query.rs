use quake_core::{QueryParams, ResponseFormat};
use url::Url;

#[test]
fn default_query_asks_for_xml_above_magnitude_five() {
    let base = Url::parse("https://earthquake.usgs.gov/fdsnws/event/1/").unwrap();
    let url = QueryParams::default().to_url(&base, "query").unwrap();

    assert_eq!(
        url.as_str(),
        "https://earthquake.usgs.gov/fdsnws/event/1/query?format=xml&minmagnitude=5"
    );
}

#[test]
fn custom_query_params_are_serialized() {
    let base = Url::parse("http://localhost:8080/api/").unwrap();
    let params = QueryParams {
        format: ResponseFormat::Xml,
        min_magnitude: 4.5,
    };
    let url = params.to_url(&base, "query").unwrap();

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    assert_eq!(url.path(), "/api/query");
    assert_eq!(
        pairs,
        vec![
            ("format".to_string(), "xml".to_string()),
            ("minmagnitude".to_string(), "4.5".to_string()),
        ]
    );
}

#[test]
fn response_format_is_xml_by_default() {
    assert_eq!(ResponseFormat::default(), ResponseFormat::Xml);
    assert_eq!(ResponseFormat::default().to_string(), "xml");
}
