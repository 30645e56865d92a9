use chromascope::core::expr::{self, CompiledExpr, EquationSet};

#[test]
fn sphere_preset_is_a_unit_sphere_for_all_inputs() {
    let p = expr::preset("sphere").expect("sphere preset");
    let eqs = EquationSet::from_sources(p.x, p.y, p.z);
    for ui in 0..10 {
        for vi in 0..10 {
            for (t, a) in [(0.0, 0.0), (2.5, 0.5), (100.0, 1.0)] {
                let u = ui as f32 / 10.0;
                let v = vi as f32 / 10.0;
                let pt = eqs.eval(u, v, t, a);
                let r2 = pt.x * pt.x + pt.y * pt.y + pt.z * pt.z;
                assert!(
                    (r2 - 1.0).abs() < 1e-4,
                    "u={u} v={v}: x²+y²+z²={r2}"
                );
            }
        }
    }
}

#[test]
fn nan_compile_behaves_identically_to_previous_function() {
    let good = expr::compile("sin(u)*v + a", &CompiledExpr::zero());
    // acos(2) is NaN at the canonical test point.
    let replaced = expr::compile("acos(2)", &good);

    let samples = [
        (0.0f32, 0.0f32, 0.0f32, 0.0f32),
        (0.1, 0.9, 3.0, 0.2),
        (0.5, 0.5, -1.0, 1.0),
        (0.99, 0.01, 42.0, 0.7),
    ];
    for (u, v, t, a) in samples {
        assert_eq!(replaced.eval(u, v, t, a), good.eval(u, v, t, a));
    }
}

#[test]
fn evaluator_rejects_anything_outside_the_grammar() {
    for src in [
        "Math.sin(u)",
        "u; v",
        "let x = 1",
        "u(v)",
        "sin",
        "2 ** 3",
        "u[0]",
        "\"text\"",
    ] {
        assert!(expr::parse(src).is_err(), "{src} should not parse");
    }
}
