use percent_encoding::{percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Custom encode set for application/x-www-form-urlencoded allowing unreserved characters including hyphens
const FORM_URLENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Encodes a string for URL safety and returns an owned `String`
///
/// # Example
/// ```
/// use oauth_authorize::authorize::url_encoding::encode_url_owned;
/// let encoded = encode_url_owned("Hello World!");
/// assert_eq!(encoded, "Hello%20World%21");
/// ```
pub fn encode_url_owned(input: &str) -> String {
    percent_encode(input.as_bytes(), FORM_URLENCODE_SET).to_string()
}

/// Encodes `params` as `k=v&k=v`, skipping pairs whose value is `None`.
pub fn encode_query<'a, I>(params: I) -> String
where
    I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
{
    params
        .into_iter()
        .filter_map(|(k, v)| v.map(|v| format!("{}={}", encode_url_owned(k), encode_url_owned(v))))
        .collect::<Vec<_>>()
        .join("&")
}

/// Appends encoded `params` to `uri`.
///
/// With `fragment` the parameters are added to the fragment, joined with `&`
/// when `uri` already has one. Otherwise they are added to the query, which
/// always stays in front of an existing fragment.
///
/// # Example
/// ```
/// use oauth_authorize::authorize::url_encoding::append_params;
/// let url = append_params("https://app.local/cb?tab=1#top", [("code", Some("x"))], false);
/// assert_eq!(url, "https://app.local/cb?tab=1&code=x#top");
/// ```
pub fn append_params<'a, I>(uri: &str, params: I, fragment: bool) -> String
where
    I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
{
    let encoded = encode_query(params);
    if encoded.is_empty() {
        return uri.to_string();
    }
    let (base, existing_fragment) = match uri.split_once('#') {
        Some((base, frag)) => (base, Some(frag)),
        None => (uri, None),
    };

    if fragment {
        return match existing_fragment {
            Some("") => format!("{}#{}", base, encoded),
            Some(frag) => format!("{}#{}&{}", base, frag, encoded),
            None => format!("{}#{}", base, encoded),
        };
    }

    let separator = match base.split_once('?') {
        Some((_, "")) => "",
        Some(_) => "&",
        None => "?",
    };
    match existing_fragment {
        Some(frag) => format!("{}{}{}#{}", base, separator, encoded, frag),
        None => format!("{}{}{}", base, separator, encoded),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn unreserved_characters_survive() {
        assert_eq!(encode_url_owned("a-b_c.d~e"), "a-b_c.d~e");
        assert_eq!(encode_url_owned("read write"), "read%20write");
    }

    #[test]
    fn missing_values_are_skipped() {
        let q = encode_query([("code", Some("abc")), ("state", None)]);
        assert_eq!(q, "code=abc");
    }

    #[test]
    fn separator_follows_existing_query() {
        let plain = append_params("https://app.local/cb", [("code", Some("x"))], false);
        assert_eq!(plain, "https://app.local/cb?code=x");
        let with_query = append_params("https://app.local/cb?tab=1", [("code", Some("x"))], false);
        assert_eq!(with_query, "https://app.local/cb?tab=1&code=x");
        let fragment = append_params("https://app.local/cb", [("error", Some("access_denied"))], true);
        assert_eq!(fragment, "https://app.local/cb#error=access_denied");
    }

    #[test]
    fn query_goes_before_an_existing_fragment() {
        let url = append_params("https://app.local/cb#section", [("code", Some("x"))], false);
        assert_eq!(url, "https://app.local/cb?code=x#section");
        let url = append_params("https://app.local/cb?#section", [("code", Some("x"))], false);
        assert_eq!(url, "https://app.local/cb?code=x#section");
    }

    #[test]
    fn fragment_params_extend_an_existing_fragment() {
        let url = append_params("https://app.local/cb#view=1", [("access_token", Some("t"))], true);
        assert_eq!(url, "https://app.local/cb#view=1&access_token=t");
        let url = append_params("https://app.local/cb#", [("access_token", Some("t"))], true);
        assert_eq!(url, "https://app.local/cb#access_token=t");
        assert_eq!(url.matches('#').count(), 1);
    }

    #[test]
    fn nothing_to_append_keeps_the_uri() {
        let url = append_params("https://app.local/cb?tab=1", [("state", None)], false);
        assert_eq!(url, "https://app.local/cb?tab=1");
    }
}
