//! PHP definitions of the runtime helpers.
//!
//! Each helper is a closure stored in `$GLOBALS` under the helper prefix.
//! Definitions are guarded so several compiled files can be included in
//! one request.

use jsphp_printer::Helper;

const DOT: &str = r#"if (!isset($GLOBALS['{prefix}dot'])) {
    $GLOBALS['{prefix}dot'] = function ($value, ...$keys) {
        foreach ($keys as $key) {
            if (is_array($value)) {
                if ($key === 'length' && !array_key_exists('length', $value)) {
                    $value = count($value);
                } else {
                    $value = array_key_exists($key, $value) ? $value[$key] : null;
                }
            } elseif (is_string($value)) {
                if ($key === 'length') {
                    $value = mb_strlen($value);
                } else {
                    $value = is_int($key) ? mb_substr($value, $key, 1) : null;
                }
            } elseif (is_object($value)) {
                if (isset($value->$key)) {
                    $value = $value->$key;
                } elseif (method_exists($value, $key)) {
                    $value = [$value, $key];
                } else {
                    $value = null;
                }
            } else {
                $value = null;
            }
        }
        return $value;
    };
}
"#;

const TYPEOF: &str = r#"if (!isset($GLOBALS['{prefix}typeof'])) {
    $GLOBALS['{prefix}typeof'] = function ($value) {
        if ($value === null) {
            return 'undefined';
        }
        if (is_bool($value)) {
            return 'boolean';
        }
        if (is_int($value) || is_float($value)) {
            return 'number';
        }
        if (is_string($value)) {
            return 'string';
        }
        if ($value instanceof \Closure) {
            return 'function';
        }
        return 'object';
    };
}
"#;

/// The definition of `helper` under `prefix`.
pub fn definition(helper: Helper, prefix: &str) -> String {
    let template = match helper {
        Helper::Dot => DOT,
        Helper::TypeOf => TYPEOF,
    };
    template.replace("{prefix}", prefix)
}

/// Definitions of `helpers`, in order, separated by blank lines.
pub fn prelude(helpers: &[Helper], prefix: &str) -> String {
    helpers
        .iter()
        .map(|&helper| definition(helper, prefix))
        .collect::<Vec<_>>()
        .join("\n")
}
