use nalgebra::Vector3;
use thiserror::Error;

/// 角度計算で許容する最小レイ長
const MIN_RAY_LENGTH: f64 = 1e-10;

/// 角度の端点が頂点と近すぎる・一致している場合のエラー
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("points are too close or identical (|v1| = {v1_length:e}, |v2| = {v2_length:e})")]
pub struct DegenerateInput {
    pub v1_length: f64,
    pub v2_length: f64,
}

/// 3点が張る平面の法線ベクトル
///
/// (p1 - p2) × (p3 - p2) を正規化して返す。3点が同一直線上・同一点の場合は
/// 未定義（長さほぼゼロの外積をそのまま正規化する）。意味のある結果には
/// 呼び出し側が非退化な3点を渡すこと。
pub fn normal_vector(p1: Vector3<f64>, p2: Vector3<f64>, p3: Vector3<f64>) -> Vector3<f64> {
    let v1 = p1 - p2;
    let v2 = p3 - p2;
    v1.cross(&v2).normalize()
}

/// 平面方程式 ax + by + cz + D = 0 の係数 D
///
/// point は平面上の点、normal は平面の法線。
pub fn plane_d(point: Vector3<f64>, normal: Vector3<f64>) -> f64 {
    -normal.dot(&point)
}

/// 点を平面へ正射影する
pub fn project_onto_plane(point: Vector3<f64>, normal: Vector3<f64>, d: f64) -> Vector3<f64> {
    let distance = normal.dot(&point) + d;
    point - distance * normal
}

/// 3点のなす符号付き角度（度）
///
/// 頂点 p2 から p1, p3 へのレイの間の角度。符号は (v1 × v2) · normal が
/// 正なら正、そうでなければ負。レイ長が 1e-10 未満なら角度は定義できない
/// ため DegenerateInput を返す。
pub fn signed_angle(
    p1: Vector3<f64>,
    p2: Vector3<f64>,
    p3: Vector3<f64>,
    normal: Vector3<f64>,
) -> Result<f64, DegenerateInput> {
    let v1 = p1 - p2;
    let v2 = p3 - p2;
    let v1_length = v1.norm();
    let v2_length = v2.norm();
    if v1_length < MIN_RAY_LENGTH || v2_length < MIN_RAY_LENGTH {
        return Err(DegenerateInput {
            v1_length,
            v2_length,
        });
    }

    // 浮動小数点誤差で acos の定義域を超えないようクランプ
    let cos = (v1.dot(&v2) / (v1_length * v2_length)).clamp(-1.0, 1.0);
    let angle_deg = cos.acos().to_degrees();

    if v1.cross(&v2).dot(&normal) > 0.0 {
        Ok(angle_deg)
    } else {
        Ok(-angle_deg)
    }
}

/// 投影してから符号付き角度を計算する
///
/// (p1, p2, p3) で張った平面へ (s1, s2, s3) を正射影し、射影後の3点の
/// 符号付き角度を返す。計測対象の3関節が平面上に正確に乗っていなくても、
/// 安定した解剖学的平面内の角度として評価できる。
pub fn projected_signed_angle(
    p1: Vector3<f64>,
    p2: Vector3<f64>,
    p3: Vector3<f64>,
    s1: Vector3<f64>,
    s2: Vector3<f64>,
    s3: Vector3<f64>,
) -> Result<f64, DegenerateInput> {
    let normal = normal_vector(p1, p2, p3);
    let d = plane_d(p1, normal);
    let ps1 = project_onto_plane(s1, normal, d);
    let ps2 = project_onto_plane(s2, normal, d);
    let ps3 = project_onto_plane(s3, normal, d);
    signed_angle(ps1, ps2, ps3, normal)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    #[test]
    fn test_normal_vector_unit_length() {
        let n = normal_vector(
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
        );
        assert!((n.norm() - 1.0).abs() < EPS, "normal not unit: {}", n.norm());
        // (1,0,0) × (0,1,0) = (0,0,1)
        assert!((n - Vector3::new(0.0, 0.0, 1.0)).norm() < EPS);
    }

    #[test]
    fn test_plane_d_point_on_plane() {
        let normal = Vector3::new(0.0, 0.0, 1.0);
        let point = Vector3::new(3.0, -2.0, 5.0);
        let d = plane_d(point, normal);
        // 平面上の点は n·p + D = 0 を満たす
        assert!((normal.dot(&point) + d).abs() < EPS);
    }

    #[test]
    fn test_project_onto_plane_idempotent() {
        let normal = normal_vector(
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 2.0, 0.5),
            Vector3::new(-1.0, 0.5, 2.0),
        );
        let d = plane_d(Vector3::new(0.0, 0.0, 0.0), normal);

        let point = Vector3::new(4.0, -3.0, 7.0);
        let once = project_onto_plane(point, normal, d);
        let twice = project_onto_plane(once, normal, d);
        assert!(
            (once - twice).norm() < EPS,
            "projection not idempotent: {:?} vs {:?}",
            once,
            twice
        );
        // 射影後の点は平面上にある
        assert!((normal.dot(&once) + d).abs() < EPS);
    }

    #[test]
    fn test_signed_angle_right_angle() {
        let p1 = Vector3::new(1.0, 0.0, 0.0);
        let p2 = Vector3::new(0.0, 0.0, 0.0);
        let p3 = Vector3::new(0.0, 1.0, 0.0);
        let normal = Vector3::new(0.0, 0.0, 1.0);

        let angle = signed_angle(p1, p2, p3, normal).unwrap();
        assert!((angle - 90.0).abs() < EPS, "expected +90, got {}", angle);

        let swapped = signed_angle(p3, p2, p1, normal).unwrap();
        assert!((swapped + 90.0).abs() < EPS, "expected -90, got {}", swapped);
    }

    #[test]
    fn test_signed_angle_antisymmetry() {
        let p1 = Vector3::new(2.0, 0.5, -1.0);
        let p2 = Vector3::new(0.3, -0.2, 0.7);
        let p3 = Vector3::new(-1.5, 2.0, 0.1);
        let normal = Vector3::new(0.0, 1.0, 0.0);

        let a = signed_angle(p1, p2, p3, normal).unwrap();
        let b = signed_angle(p3, p2, p1, normal).unwrap();
        assert!((a + b).abs() < EPS, "not antisymmetric: {} vs {}", a, b);
        assert!(a > -180.0 && a <= 180.0);
    }

    #[test]
    fn test_signed_angle_degenerate_ray() {
        let p = Vector3::new(1.0, 1.0, 1.0);
        let normal = Vector3::new(0.0, 0.0, 1.0);

        // p1 == p2: 長さゼロのレイ
        let result = signed_angle(p, p, Vector3::new(2.0, 0.0, 0.0), normal);
        assert!(result.is_err());

        // 頂点に近すぎる端点
        let near = p + Vector3::new(1e-12, 0.0, 0.0);
        let result = signed_angle(near, p, Vector3::new(2.0, 0.0, 0.0), normal);
        assert!(result.is_err());
    }

    #[test]
    fn test_signed_angle_cosine_clamped() {
        // ほぼ平行なレイでも acos が NaN にならない
        let p1 = Vector3::new(1.0, 1e-13, 0.0);
        let p2 = Vector3::new(0.0, 0.0, 0.0);
        let p3 = Vector3::new(2.0, 0.0, 0.0);
        let normal = Vector3::new(0.0, 0.0, 1.0);

        let angle = signed_angle(p1, p2, p3, normal).unwrap();
        assert!(angle.is_finite());
        assert!(angle.abs() < 1e-3);
    }

    #[test]
    fn test_projected_signed_angle_coplanar_unchanged() {
        // XY平面上の3点はXY平面への射影で変化しない
        let p1 = Vector3::new(1.0, 0.0, 0.0);
        let p2 = Vector3::new(0.0, 0.0, 0.0);
        let p3 = Vector3::new(0.0, 1.0, 0.0);

        let direct = signed_angle(p1, p2, p3, Vector3::new(0.0, 0.0, 1.0)).unwrap();
        let projected = projected_signed_angle(p1, p2, p3, p1, p2, p3).unwrap();
        assert!(
            (direct - projected).abs() < EPS,
            "direct {} vs projected {}",
            direct,
            projected
        );
    }

    #[test]
    fn test_projected_signed_angle_flattens_offset() {
        // 平面外オフセットのある点も射影後は平面内角度になる
        let p1 = Vector3::new(1.0, 0.0, 0.0);
        let p2 = Vector3::new(0.0, 0.0, 0.0);
        let p3 = Vector3::new(0.0, 1.0, 0.0);

        let s1 = Vector3::new(1.0, 0.0, 3.0);
        let s2 = Vector3::new(0.0, 0.0, -2.0);
        let s3 = Vector3::new(0.0, 1.0, 0.5);

        let angle = projected_signed_angle(p1, p2, p3, s1, s2, s3).unwrap();
        assert!((angle - 90.0).abs() < EPS, "expected +90, got {}", angle);
    }
}
