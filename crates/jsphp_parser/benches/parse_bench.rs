use criterion::{black_box, criterion_group, criterion_main, Criterion};
use jsphp_options::CompilerOptions;
use jsphp_parser::parse;

// A medium-size template script with the supported constructs
const SOURCE: &str = r#"
// Settings
let defaults = {
    title: 'Untitled',
    items: [1, 2, 3],
    ratio: Math.PI / 4,
    limit: Infinity
};

function merge(target, source) {
    for (let key = 0; key < source.length; key++) {
        target[key] = source[key];
    }
    return target;
}

let total = 0;
let count = items.length;
for (let i = 0; i < count; i++) {
    let item = items[i];
    if (item.price > 0 && !item.hidden) {
        total += item.price * item.quantity;
    } else if (item.free) {
        continue;
    } else {
        skipped.push(item);
    }
}

let label = total > 100 ? 'large' : total > 10 ? 'medium' : 'small';
let format = (value, digits) => number_format(value, digits);
let shout = text => strtoupper(text);

switch (label) {
    case 'large':
        discount = 0.1;
        break;
    case 'medium':
        discount = 0.05;
        break;
    default:
        discount = 0;
}

try {
    result = merge(defaults, options.overrides);
} catch (e) {
    result = defaults;
} finally {
    done = true;
}

do {
    attempts++;
} while (attempts < 3)

summary = {
    total: format(total, 2),
    label: shout(label),
    kind: typeof result,
    empty: void 0
};
"#;

fn bench_parse(c: &mut Criterion) {
    let options = CompilerOptions::default();
    c.bench_function("parse_medium", |b| {
        b.iter(|| {
            let unit = parse("bench.js", black_box(SOURCE), &options);
            black_box(unit)
        });
    });
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
